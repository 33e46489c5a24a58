use std::collections::HashSet;

/// Hands out aliases unique within one select.
#[derive(Debug, Default)]
pub(super) struct AliasSet {
    taken: HashSet<String>,
}

impl AliasSet {
    /// Returns `base` when free, otherwise `base_2`, `base_3`, ...
    pub(super) fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }

        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
