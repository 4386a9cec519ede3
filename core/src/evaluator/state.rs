//! Variable bags visible to a single evaluation.

use crate::values::{Map, Value};

/// Number of regex capture slots written after every match: `$0`..`$9`.
pub const CAPTURE_SLOTS: usize = 10;

/// State key holding capture group `index`.
pub fn capture_key(index: usize) -> String {
    format!("${index}")
}

/// Read-only `vars` plus read-write `state`.
///
/// `state` shadows `vars`. Assignments and regex captures only ever write
/// to `state`.
pub struct EvalContext<'a> {
    vars: &'a Map,
    state: &'a mut Map,
}

impl<'a> EvalContext<'a> {
    pub fn new(vars: &'a Map, state: &'a mut Map) -> Self {
        Self { vars, state }
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.state.get(name).or_else(|| self.vars.get(name))
    }

    pub fn assign(&mut self, name: String, value: Value) {
        self.state.insert(name, value);
    }

    /// Publishes the outcome of a regex match into `$0`..`$9`.
    ///
    /// Groups that exist and participated are set; every other slot is
    /// removed, so a failed match (`None`) clears all of them.
    pub fn record_captures(&mut self, captures: Option<&[Option<String>]>) {
        for index in 0..CAPTURE_SLOTS {
            let key = capture_key(index);
            match captures.and_then(|groups| groups.get(index)).cloned().flatten() {
                Some(text) => {
                    self.state.insert(key, Value::String(text));
                }
                None => {
                    self.state.remove(&key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_state_shadows_vars() {
        let vars: Map = [("x".to_string(), Value::from(1)), ("y".to_string(), Value::from(2))]
            .into_iter()
            .collect();
        let mut state: Map = [("x".to_string(), Value::from(10))].into_iter().collect();
        let mut ctx = EvalContext::new(&vars, &mut state);
        assert_eq!(ctx.lookup("x"), Some(&Value::from(10)));
        assert_eq!(ctx.lookup("y"), Some(&Value::from(2)));
        assert_eq!(ctx.lookup("z"), None);

        ctx.assign("y".to_string(), Value::from("s"));
        assert_eq!(ctx.lookup("y"), Some(&Value::from("s")));
        assert_eq!(vars.get("y"), Some(&Value::from(2)));
    }

    #[test]
    fn test_record_captures() {
        let vars = Map::new();
        let mut state = Map::new();
        state.insert("$5".to_string(), Value::from("stale"));
        {
            let mut ctx = EvalContext::new(&vars, &mut state);
            let groups = [Some("xy".to_string()), Some("x".to_string()), None];
            ctx.record_captures(Some(&groups[..]));
        }
        assert_eq!(state.get("$0"), Some(&Value::from("xy")));
        assert_eq!(state.get("$1"), Some(&Value::from("x")));
        assert_eq!(state.get("$2"), None);
        assert_eq!(state.get("$5"), None);

        EvalContext::new(&vars, &mut state).record_captures(None);
        assert!(state.is_empty());
    }
}
