use std::fmt;

/// A single search query derived from a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self(query.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered, single-pass sequence of candidate queries for one title.
#[derive(Debug)]
pub struct QueryCandidates {
    title: String,
    queries: std::vec::IntoIter<Query>,
}

impl QueryCandidates {
    /// Title the candidates were generated from
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Iterator for QueryCandidates {
    type Item = Query;

    fn next(&mut self) -> Option<Query> {
        self.queries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.queries.size_hint()
    }
}

impl ExactSizeIterator for QueryCandidates {}

/// Builds keyword-qualified queries first, bare titles last.
#[derive(Debug, Clone)]
pub struct QueryGenerator {
    keywords: Vec<String>,
}

impl QueryGenerator {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn candidates(&self, title: &str) -> QueryCandidates {
        let bases = base_variants(title);
        let mut queries = Vec::with_capacity(bases.len() * (self.keywords.len() + 1));

        for base in &bases {
            for keyword in &self.keywords {
                queries.push(Query::new(format!("{} {}", base, keyword)));
            }
        }
        queries.extend(bases.into_iter().map(Query::new));

        QueryCandidates {
            title: title.to_string(),
            queries: queries.into_iter(),
        }
    }
}

/// The title itself, plus a CJK-free variant when that differs.
fn base_variants(title: &str) -> Vec<String> {
    let mut bases = vec![title.to_string()];
    if title.chars().any(is_cjk) {
        let sanitized = strip_cjk(title);
        // A title made only of CJK leaves nothing worth searching for.
        if !sanitized.is_empty() && sanitized != title {
            bases.push(sanitized);
        }
    }
    bases
}

/// Remove CJK, Kana and Hangul characters and collapse whitespace.
pub fn strip_cjk(title: &str) -> String {
    let kept: String = title.chars().filter(|c| !is_cjk(*c)).collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_cjk(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x11FF     // Hangul Jamo
        | 0x3000..=0x303F   // CJK symbols and punctuation
        | 0x3040..=0x309F   // Hiragana
        | 0x30A0..=0x30FF   // Katakana
        | 0x3130..=0x318F   // Hangul compatibility Jamo
        | 0x31F0..=0x31FF   // Katakana phonetic extensions
        | 0x3400..=0x4DBF   // CJK extension A
        | 0x4E00..=0x9FFF   // CJK unified ideographs
        | 0xAC00..=0xD7AF   // Hangul syllables
        | 0xF900..=0xFAFF   // CJK compatibility ideographs
        | 0xFF65..=0xFFDC   // Halfwidth Katakana and Hangul
        | 0x20000..=0x2FA1F // CJK extensions B to F, compatibility supplement
        | 0x30000..=0x323AF // CJK extensions G and H
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> QueryGenerator {
        QueryGenerator::new(vec!["sub".to_string(), "eng sub".to_string()])
    }

    fn collect(candidates: QueryCandidates) -> Vec<String> {
        candidates.map(|q| q.to_string()).collect()
    }

    #[test]
    fn test_keyword_queries_come_before_bare_title() {
        let queries = collect(generator().candidates("Spirited Away"));
        assert_eq!(
            queries,
            vec!["Spirited Away sub", "Spirited Away eng sub", "Spirited Away"]
        );
    }

    #[test]
    fn test_latin_title_has_no_sanitized_variant() {
        let candidates = generator().candidates("Amélie  (2001)");
        assert_eq!(candidates.len(), 3);
        assert!(collect(candidates).iter().all(|q| q.starts_with("Amélie  (2001)")));
    }

    #[test]
    fn test_cjk_title_adds_sanitized_variant() {
        let queries = collect(generator().candidates("千と千尋の神隠し Spirited Away"));
        assert_eq!(
            queries,
            vec![
                "千と千尋の神隠し Spirited Away sub",
                "千と千尋の神隠し Spirited Away eng sub",
                "Spirited Away sub",
                "Spirited Away eng sub",
                "千と千尋の神隠し Spirited Away",
                "Spirited Away",
            ]
        );
    }

    #[test]
    fn test_query_count_matches_variants_and_keywords() {
        let generator = QueryGenerator::new(
            crate::config::DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        );
        let k = generator.keywords().len();

        assert_eq!(generator.candidates("Parasite").len(), k + 1);
        assert_eq!(generator.candidates("기생충 Parasite").len(), 2 * (k + 1));
        assert_eq!(generator.candidates("기생충").len(), k + 1);
    }

    #[test]
    fn test_strip_cjk_collapses_whitespace() {
        assert_eq!(strip_cjk("  君の名は。  Your   Name "), "Your Name");
        assert_eq!(strip_cjk("東京"), "");
    }

    #[test]
    fn test_fullwidth_latin_is_kept() {
        let generator = generator();
        let k = generator.keywords().len();

        assert_eq!(generator.candidates("ＡＫＩＲＡ").len(), k + 1);
        assert_eq!(strip_cjk("ＡＫＩＲＡ 아키라"), "ＡＫＩＲＡ");
        assert_eq!(strip_cjk("ｱｷﾗ Akira"), "Akira");
    }

    #[test]
    fn test_supplementary_ideographs_are_stripped() {
        assert_eq!(strip_cjk("𠮷野家 Yoshinoya"), "Yoshinoya");

        let queries = collect(generator().candidates("𠮷野家 Yoshinoya"));
        assert_eq!(queries.len(), 6);
        assert!(queries.contains(&"Yoshinoya".to_string()));
    }

    #[test]
    fn test_candidates_remember_title() {
        let candidates = generator().candidates("Akira");
        assert_eq!(candidates.title(), "Akira");
    }
}
