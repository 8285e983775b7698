/// Identifiers generated method bodies bind locally.
pub const SCRATCH_NAMES: &[&str] = &["sql", "params", "row", "rows", "record", "value", "items"];

/// Strict and reserved Rust keywords.
pub const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final",
    "gen", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// True for names a generated method parameter must not take.
pub fn is_reserved(name: &str) -> bool {
    SCRATCH_NAMES.contains(&name) || KEYWORDS.contains(&name)
}
