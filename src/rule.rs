use crate::graph::{AdjacencyGraph, NodeId};
use crate::token::{Token, TokenAllocator};
use ahash::AHashMap as HashMap;
use tracing::debug;

/// Position of a rule in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(usize);

impl RuleId {
    /// Position in creation order, starting at zero.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A learned substitution of a two-word phrase by a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    phrase: String,
    /// Text matched against bodies. Identical to the phrase; no escaping is applied.
    pattern: String,
    token: Token,
}

impl Rule {
    fn new(phrase: String, token: Token) -> Self {
        Self {
            pattern: phrase.clone(),
            phrase,
            token,
        }
    }

    /// The two words this rule replaces, space-joined.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// The literal text searched for in bodies.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The token substituted for the phrase.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Replaces every whole-word occurrence of the pattern with the token.
    ///
    /// Returns the new text and the number of replacements.
    pub fn apply(&self, text: &str) -> (String, usize) {
        substitute(text, &self.pattern, self.token.as_str())
    }
}

/// Literal, non-overlapping, left-to-right replacement of `pattern`.
///
/// A match only counts when it is bounded by whitespace or the ends of
/// `text`, so `"a b"` never matches inside `"aa bb"`.
pub(crate) fn substitute(text: &str, pattern: &str, replacement: &str) -> (String, usize) {
    if pattern.is_empty() {
        return (text.to_string(), 0);
    }

    let mut out = String::new();
    let mut count = 0;
    let mut copied = 0;
    let mut search = 0;

    while let Some(found) = text[search..].find(pattern) {
        let start = search + found;
        let end = start + pattern.len();

        let open = text[..start]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        let close = text[end..].chars().next().map_or(true, char::is_whitespace);

        if open && close {
            out.push_str(&text[copied..start]);
            out.push_str(replacement);
            copied = end;
            search = end;
            count += 1;
        } else {
            // Step one character so an overlapping whole-word match is not skipped
            search = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
    }

    if count == 0 {
        return (text.to_string(), 0);
    }
    out.push_str(&text[copied..]);
    (out, count)
}

/// Insertion-ordered table of rules, one per distinct phrase.
///
/// Rules are applied in creation order: a later rule's phrase may contain an
/// earlier rule's token, never the reverse.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    index: HashMap<String, RuleId>,
    tokens: TokenAllocator,
}

impl RuleSet {
    /// Creates an empty rule set whose token counter starts at `<0>`.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            index: HashMap::default(),
            tokens: TokenAllocator::new(),
        }
    }

    /// Creates a rule for the adjacency `predecessor -> node`.
    ///
    /// Returns `None` when a rule for that phrase already exists.
    pub fn induce(
        &mut self,
        graph: &AdjacencyGraph,
        predecessor: NodeId,
        node: NodeId,
    ) -> Option<RuleId> {
        self.induce_phrase(graph.text(predecessor), graph.text(node))
    }

    /// Creates a rule for the phrase `first second` unless one exists.
    pub fn induce_phrase(&mut self, first: &str, second: &str) -> Option<RuleId> {
        let phrase = format!("{first} {second}");
        if self.index.contains_key(&phrase) {
            return None;
        }

        let id = RuleId(self.rules.len());
        let token = self.tokens.allocate();
        debug!(phrase = %phrase, token = %token, "induced rule");

        self.index.insert(phrase.clone(), id);
        self.rules.push(Rule::new(phrase, token));
        Some(id)
    }

    /// Applies every rule, in creation order, to `line`.
    ///
    /// Returns the rewritten line and the total number of replacements.
    pub fn apply_all(&self, line: &str) -> (String, usize) {
        let mut text = line.to_string();
        let mut changes = 0;
        for rule in &self.rules {
            let (next, delta) = rule.apply(&text);
            if delta > 0 {
                text = next;
                changes += delta;
            }
        }
        (text, changes)
    }

    /// Applies a single rule to `line`.
    pub fn apply_one(&self, line: &str, rule: &Rule) -> (String, usize) {
        rule.apply(line)
    }

    /// Returns the rule with the given id.
    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.0)
    }

    /// Finds the rule for a phrase.
    pub fn lookup(&self, phrase: &str) -> Option<&Rule> {
        self.index.get(phrase).map(|id| &self.rules[id.0])
    }

    /// True when a rule exists for `phrase`.
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        self.index.contains_key(phrase)
    }

    /// Rules in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Phrases in creation order.
    pub fn phrases(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.iter().map(Rule::phrase)
    }

    /// Tokens in creation order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.rules.iter().map(Rule::token)
    }

    /// The most recently allocated token (`<0>` before any rule exists).
    pub fn current_token(&self) -> Token {
        self.tokens.current()
    }

    /// Number of rules induced.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True before the first induction.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_whole_words() {
        assert_eq!(
            substitute("a b c a b", "a b", "<1>"),
            ("<1> c <1>".to_string(), 2)
        );
        assert_eq!(substitute("aa bb", "a b", "<1>"), ("aa bb".to_string(), 0));
        assert_eq!(substitute("xa b", "a b", "<1>"), ("xa b".to_string(), 0));
    }

    #[test]
    fn test_substitute_after_rejected_overlap() {
        // First hit "a a" at 1 is inside "aa"; the whole-word hit starts at 3
        assert_eq!(substitute("aa a a", "a a", "<1>"), ("aa <1>".to_string(), 1));
    }

    #[test]
    fn test_substitute_non_overlapping() {
        assert_eq!(substitute("x x x", "x x", "<1>"), ("<1> x".to_string(), 1));
        assert_eq!(substitute("x x x x", "x x", "<1>"), ("<1> <1>".to_string(), 2));
    }

    #[test]
    fn test_substitute_multibyte() {
        assert_eq!(
            substitute("ééa b", "a b", "<1>"),
            ("ééa b".to_string(), 0)
        );
        assert_eq!(substitute("é a b", "a b", "<1>"), ("é <1>".to_string(), 1));
    }

    #[test]
    fn test_induce_allocates_in_order() {
        let mut rules = RuleSet::new();
        assert_eq!(rules.current_token().as_str(), "<0>");

        let first = rules.induce_phrase("connection", "reset").unwrap();
        let second = rules.induce_phrase("by", "peer").unwrap();
        assert_eq!(rules.get(first).unwrap().token().as_str(), "<1>");
        assert_eq!(rules.get(second).unwrap().token().as_str(), "<2>");
        assert_eq!(rules.current_token().as_str(), "<2>");
        assert_eq!(
            rules.phrases().collect::<Vec<_>>(),
            vec!["connection reset", "by peer"]
        );
    }

    #[test]
    fn test_induce_is_idempotent() {
        let mut rules = RuleSet::new();
        assert!(rules.induce_phrase("connection", "reset").is_some());
        assert!(rules.induce_phrase("connection", "reset").is_none());
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.current_token().as_str(), "<1>");
    }

    #[test]
    fn test_induce_from_graph() {
        let mut graph = AdjacencyGraph::new();
        let walked = graph.walk_line("disk full");
        let mut rules = RuleSet::new();
        let id = rules
            .induce(&graph, walked[1].predecessor, walked[1].node)
            .unwrap();
        let rule = rules.get(id).unwrap();
        assert_eq!(rule.phrase(), "disk full");
        assert_eq!(rule.pattern(), "disk full");
        assert!(rules.contains_phrase("disk full"));
    }

    #[test]
    fn test_apply_all_composes_in_order() {
        let mut rules = RuleSet::new();
        rules.induce_phrase("connection", "reset");
        rules.induce_phrase("<1>", "error");

        let (line, changes) = rules.apply_all("connection reset error at connection reset");
        assert_eq!(line, "<2> at <1>");
        assert_eq!(changes, 3);
    }

    #[test]
    fn test_apply_one() {
        let mut rules = RuleSet::new();
        let id = rules.induce_phrase("disk", "full").unwrap();
        let rule = rules.get(id).unwrap().clone();
        assert_eq!(
            rules.apply_one("disk full disk empty", &rule),
            ("<1> disk empty".to_string(), 1)
        );
    }

    #[test]
    fn test_lookup() {
        let mut rules = RuleSet::new();
        rules.induce_phrase("disk", "full");
        assert_eq!(rules.lookup("disk full").unwrap().token().as_str(), "<1>");
        assert!(rules.lookup("disk empty").is_none());
        assert_eq!(rules.iter().count(), 1);
        assert_eq!(rules.tokens().count(), 1);
    }
}
