//! Key lists shared by `build.rs` and the tests.

/// Integers with many shared digits.
pub const INIT_SEQ: [i32; 129] = [
    19, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11, 111, 1112, 1115, 1118, 1110, 1977, 177, 277, 477, 577, 677,
    777, 877, 977, 1077, 1177, 11177, 111_277, 111_577, 111_877, 111_077, 1999, 199, 299, 499, 599,
    699, 799, 899, 999, 1099, 1199, 11199, 111_299, 111_599, 111_899, 111_099, 197_799, 17799,
    27799, 47799, 57799, 67799, 77799, 87799, 97799, 107_799, 117_799, 1_117_799, 11_127_799,
    11_157_799, 11_187_799, 11_107_799, 1988, 188, 288, 488, 588, 688, 788, 888, 988, 1088, 1188,
    11188, 111_288, 111_588, 111_888, 111_088, 197_788, 17788, 27788, 47788, 57788, 67788, 77788,
    87788, 97788, 107_788, 117_788, 1_117_788, 11_127_788, 11_157_788, 11_187_788, 11_107_788,
    199_988, 19988, 29988, 49988, 59988, 69988, 79988, 89988, 99988, 109_988, 119_988, 1_119_988,
    11_129_988, 11_159_988, 11_189_988, 11_109_988, 19_779_988, 1_779_988, 2_779_988, 4_779_988,
    5_779_988, 6_779_988, 7_779_988, 8_779_988, 9_779_988, 10_779_988, 11_779_988, 111_779_988,
    1_112_779_988, 1_115_779_988, 1_118_779_988, 1_110_779_988, 456,
];

/// Strict and reserved Rust keywords.
pub const KEYWORDS: [&str; 51] = [
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe",
    "use", "where", "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "typeof", "unsized", "virtual", "yield", "try",
];

/// Small primes, also spelled out in a `set!` invocation in the tests.
pub const PRIMES: [u16; 10] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29];
