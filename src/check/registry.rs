//! Registration table for all diagnostic suites. Built at startup and passed
//! to the runner; nothing here is process-global.

use std::collections::BTreeMap;

use crate::check::{diskusage, dummy, oom, systemload, Checker};

pub fn registry() -> BTreeMap<&'static str, Box<dyn Checker>> {
    let checkers: Vec<Box<dyn Checker>> = vec![
        Box::new(dummy::DummyChecker),
        Box::new(oom::OomChecker::new()),
        Box::new(diskusage::DiskUsageChecker::new()),
        Box::new(systemload::SystemLoadChecker),
    ];
    checkers.into_iter().map(|c| (c.name(), c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_sorted_and_unique() {
        let names: Vec<&str> = registry().keys().copied().collect();
        assert_eq!(names, vec!["diskusage", "dummy", "oom", "systemload"]);
    }
}
