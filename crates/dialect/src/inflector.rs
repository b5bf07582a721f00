//! English inflection for model names.
//!
//! Model names become URL path segments and collection payload keys through
//! [`pluralize`] (`person` → `people`, `post` → `posts`), and camelCase host
//! names become PascalCase dialect keys through [`capitalize`].
//!
//! Compound names (`lineItem`, `line-item`, `line_item`) are inflected on
//! their last word only; the leading phrase is kept as written.

/// Words whose plural is the word itself.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

/// `(singular, plural)` pairs that no suffix rule produces.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("cow", "kine"),
    ("zombie", "zombies"),
];

/// Upper-cases the first character and leaves the rest untouched.
///
/// `fullName` → `FullName`, `id` → `Id`, `""` → `""`.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns the English plural of `word`.
///
/// Irregular and uncountable words are recognised on the last word of a
/// compound name; suffix rules look at the end of the whole name.
pub fn pluralize(word: &str) -> String {
    if word.trim().is_empty() {
        return word.to_string();
    }

    let (head, last) = split_last_word(word);
    let last_lower = last.to_lowercase();

    if UNCOUNTABLE.contains(&last_lower.as_str()) {
        return word.to_string();
    }

    for (singular, plural) in IRREGULAR {
        if last_lower == *singular {
            return format!("{head}{}", match_case(last, plural));
        }
        if last_lower == *plural {
            return word.to_string();
        }
    }

    apply_suffix_rules(word)
}

/// Splits a compound name into `(leading phrase, last word)`.
///
/// The boundary is the last `-`, `_`, `/` or space, or failing that the last
/// upper-case letter of a camelCase name.
fn split_last_word(word: &str) -> (&str, &str) {
    if let Some(pos) = word.rfind(['-', '_', '/', ' ']) {
        return word.split_at(pos + 1);
    }
    match word.char_indices().rev().find(|(_, c)| c.is_uppercase()) {
        Some((pos, _)) if pos > 0 => word.split_at(pos),
        _ => ("", word),
    }
}

/// Carries the case of `original`'s first letter over to `replacement`.
fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().next().is_some_and(char::is_uppercase) {
        capitalize(replacement)
    } else {
        replacement.to_string()
    }
}

/// Suffix rules, highest priority first.
fn apply_suffix_rules(word: &str) -> String {
    let lower = word.to_lowercase();
    let stem = |cut: usize| &word[..word.len() - cut];

    match lower.as_str() {
        "quiz" => return format!("{word}zes"),
        "oxen" => return word.to_string(),
        "ox" => return format!("{word}en"),
        "mouse" | "louse" => return format!("{}ice", stem(4)),
        "axis" | "testis" => return format!("{}es", stem(2)),
        _ => {}
    }

    if ["matrix", "vertex", "index"].iter().any(|s| lower.ends_with(s)) {
        return format!("{}ices", stem(2));
    }
    if ["x", "ch", "ss", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{word}es");
    }
    if let Some(before_y) = lower.strip_suffix('y') {
        let consonant = before_y
            .chars()
            .last()
            .is_some_and(|c| !"aeiouy".contains(c));
        if consonant || before_y.ends_with("qu") {
            return format!("{}ies", stem(1));
        }
    }
    if lower.ends_with("hive") {
        return format!("{word}s");
    }
    if let Some(before_fe) = lower.strip_suffix("fe") {
        if before_fe.chars().last().is_some_and(|c| c != 'f') {
            return format!("{}ves", stem(2));
        }
    }
    if lower.ends_with("lf") || lower.ends_with("rf") {
        return format!("{}ves", stem(1));
    }
    if lower.ends_with("sis") {
        return format!("{}ses", stem(3));
    }
    if lower.ends_with("ta") || lower.ends_with("ia") {
        return word.to_string();
    }
    if lower.ends_with("tum") || lower.ends_with("ium") {
        return format!("{}a", stem(2));
    }
    if lower.ends_with("buffalo") || lower.ends_with("tomato") {
        return format!("{word}es");
    }
    if ["bus", "alias", "status", "bonus"].iter().any(|s| lower.ends_with(s)) {
        return format!("{word}es");
    }
    if lower.ends_with("octopi") || lower.ends_with("viri") {
        return word.to_string();
    }
    if lower.ends_with("octopus") || lower.ends_with("virus") {
        return format!("{}i", stem(2));
    }
    if lower.ends_with('s') {
        return word.to_string();
    }
    format!("{word}s")
}
