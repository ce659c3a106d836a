//! Always-green checker, useful for wiring and batch smoke tests.

use crate::check::result::CheckResult;
use crate::check::Checker;
use crate::utils::Result;

pub struct DummyChecker;

impl Checker for DummyChecker {
    fn name(&self) -> &'static str {
        "dummy"
    }

    fn check(&self) -> Result<Vec<CheckResult>> {
        Ok(vec![CheckResult {
            checker: self.name().to_string(),
            description: "dummy check passed".to_string(),
            ..Default::default()
        }])
    }
}
