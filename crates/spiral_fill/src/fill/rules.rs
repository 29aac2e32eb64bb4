//! Composable exclusion rules for ranked items.
//!
//! An item is excluded when any rule in an [`ExclusionRules`] set matches it. Filtering
//! never reorders items, so ranks survive exclusion.
use std::collections::HashSet;
use std::fmt;

/// Items that carry a stable identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for String {
    fn id(&self) -> &str {
        self
    }
}

impl Identified for &str {
    fn id(&self) -> &str {
        self
    }
}

/// A single reason to leave an item out of the fill.
pub trait ExclusionRule<T>: Send + Sync {
    /// Short name reported in events and logs.
    fn name(&self) -> &str;

    fn excludes(&self, item: &T) -> bool;
}

/// Excludes items whose identifier is in a fixed set.
#[derive(Clone, Debug, Default)]
pub struct ExcludeIds {
    ids: HashSet<String>,
}

impl ExcludeIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<T: Identified> ExclusionRule<T> for ExcludeIds {
    fn name(&self) -> &str {
        "exclude_ids"
    }

    fn excludes(&self, item: &T) -> bool {
        self.ids.contains(item.id())
    }
}

/// Excludes items whose metric is strictly greater than a threshold.
pub struct ExcludeAbove<F> {
    name: String,
    threshold: f64,
    metric: F,
}

impl<F> ExcludeAbove<F> {
    pub fn new(name: impl Into<String>, threshold: f64, metric: F) -> Self {
        Self {
            name: name.into(),
            threshold,
            metric,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl<T, F> ExclusionRule<T> for ExcludeAbove<F>
where
    F: Fn(&T) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn excludes(&self, item: &T) -> bool {
        (self.metric)(item) > self.threshold
    }
}

/// Excludes items matching an arbitrary predicate.
pub struct FnRule<F> {
    name: String,
    predicate: F,
}

impl<F> FnRule<F> {
    pub fn new(name: impl Into<String>, predicate: F) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }
}

impl<T, F> ExclusionRule<T> for FnRule<F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn excludes(&self, item: &T) -> bool {
        (self.predicate)(item)
    }
}

/// An ordered set of exclusion rules. The empty set excludes nothing.
pub struct ExclusionRules<T> {
    rules: Vec<Box<dyn ExclusionRule<T>>>,
}

impl<T> ExclusionRules<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule to the set.
    pub fn with_rule<R: ExclusionRule<T> + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn push(&mut self, rule: Box<dyn ExclusionRule<T>>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Name of the first rule that excludes `item`, if any.
    pub fn first_match(&self, item: &T) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.excludes(item))
            .map(|r| r.name())
    }

    pub fn excludes(&self, item: &T) -> bool {
        self.first_match(item).is_some()
    }

    /// Keeps the items no rule excludes, in their original order.
    pub fn retain(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items.into_iter().filter(|i| !self.excludes(i)).collect()
    }
}

impl<T> fmt::Debug for ExclusionRules<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}

impl<T> Default for ExclusionRules<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Model {
        id: String,
        tris: u32,
    }

    impl Identified for Model {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn model(id: &str, tris: u32) -> Model {
        Model {
            id: id.into(),
            tris,
        }
    }

    #[test]
    fn empty_rules_exclude_nothing() {
        let rules: ExclusionRules<Model> = ExclusionRules::default();
        assert!(rules.is_empty());
        assert!(!rules.excludes(&model("a", 1)));
    }

    #[test]
    fn id_rule_matches_members_only() {
        let rule = ExcludeIds::new(["cat", "dog"]);
        assert_eq!(rule.len(), 2);
        assert!(ExclusionRule::<Model>::excludes(&rule, &model("cat", 0)));
        assert!(!ExclusionRule::<Model>::excludes(&rule, &model("cow", 0)));
        assert!(ExclusionRule::<String>::excludes(&rule, &"dog".to_string()));
    }

    #[test]
    fn threshold_is_exclusive() {
        let rule = ExcludeAbove::new("max_tris", 8000.0, |m: &Model| m.tris as f64);
        assert!(!rule.excludes(&model("a", 8000)));
        assert!(rule.excludes(&model("b", 8001)));
        assert_eq!(rule.threshold(), 8000.0);
    }

    #[test]
    fn first_match_reports_rule_in_insertion_order() {
        let rules = ExclusionRules::new()
            .with_rule(ExcludeIds::new(["heavy"]))
            .with_rule(ExcludeAbove::new("max_tris", 100.0, |m: &Model| {
                m.tris as f64
            }))
            .with_rule(FnRule::new("empty_id", |m: &Model| m.id.is_empty()));

        assert_eq!(rules.len(), 3);
        assert_eq!(rules.first_match(&model("heavy", 500)), Some("exclude_ids"));
        assert_eq!(rules.first_match(&model("big", 500)), Some("max_tris"));
        assert_eq!(rules.first_match(&model("", 5)), Some("empty_id"));
        assert_eq!(rules.first_match(&model("ok", 5)), None);
    }

    #[test]
    fn retain_preserves_rank_order() {
        let rules = ExclusionRules::new().with_rule(FnRule::new("odd", |m: &Model| {
            m.tris % 2 == 1
        }));
        let kept = rules.retain(vec![
            model("a", 2),
            model("b", 3),
            model("c", 4),
            model("d", 5),
            model("e", 6),
        ]);
        let ids: Vec<_> = kept.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "e"]);
    }
}
