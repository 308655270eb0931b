//! Built-in language rules, looked up by file extension
//!
//! Every rule is plain immutable data. Keywords ending in `|` belong to the
//! type/builtin class, all others are general keywords.

use std::path::Path;

/// Language family, selecting the language-specific highlighting hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    CLike,
    LuaLike,
    PythonLike,
    RiddleLike,
}

impl Dialect {
    /// Keywords after which the next identifier is a definition name
    pub fn definition_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::CLike => &["class", "struct"],
            Self::LuaLike => &["function"],
            Self::PythonLike => &["def", "class"],
            Self::RiddleLike => &["fun", "func", "def", "class"],
        }
    }

    /// Whether `name(` marks `name` as a definition/call site
    pub fn highlights_calls(&self) -> bool {
        matches!(self, Self::CLike)
    }

    /// Whether rows starting with `#` are preprocessor directives
    pub fn has_preprocessor(&self) -> bool {
        matches!(self, Self::CLike)
    }
}

/// Highlighting rules for one language
#[derive(Debug, PartialEq, Eq)]
pub struct SyntaxRule {
    pub filetype: &'static str,
    pub extensions: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub single_line_comment: Option<&'static str>,
    pub block_comment: Option<(&'static str, &'static str)>,
    pub dialect: Dialect,
}

/// A keyword split into its text and class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword<'a> {
    pub text: &'a str,
    pub is_type: bool,
}

impl SyntaxRule {
    /// Iterate keywords with the trailing `|` marker resolved
    pub fn classified_keywords(&self) -> impl Iterator<Item = Keyword<'static>> + '_ {
        self.keywords.iter().map(|&kw| match kw.strip_suffix('|') {
            Some(text) => Keyword {
                text,
                is_type: true,
            },
            None => Keyword {
                text: kw,
                is_type: false,
            },
        })
    }

    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| *e == ext)
    }
}

const C_KEYWORDS: &[&str] = &[
    "switch", "if", "while", "for", "break", "continue", "return", "else",
    "struct", "union", "typedef", "static", "enum", "case",
    "#include", "#define", "#ifdef", "#ifndef", "#endif", "#pragma",
    "volatile", "register", "sizeof", "const", "auto", "do", "goto",
    "default", "extern", "inline", "restrict",
    "namespace", "public", "private", "protected", "virtual", "friend",
    "new", "delete", "try", "catch", "throw", "this", "constexpr",
    "final", "override", "explicit", "using",
    "int|", "long|", "double|", "float|", "char|", "unsigned|", "signed|",
    "void|", "bool|", "short|", "size_t|", "uint8_t|", "uint16_t|", "uint32_t|",
    "uint64_t|", "int8_t|", "int16_t|", "int32_t|", "int64_t|", "FILE|", "time_t|",
    "class|", "template|",
    "true|", "false|", "NULL|", "nullptr|",
];

const LUA_KEYWORDS: &[&str] = &[
    "function", "local", "if", "then", "else", "elseif", "end", "while",
    "do", "for", "repeat", "until", "break", "return", "in", "and", "or", "not",
    "true|", "false|", "nil|",
    "print|", "pairs|", "ipairs|", "type|", "tonumber|", "tostring|", "require|",
    "table|", "string|", "math|", "os|", "io|", "coroutine|", "error|", "assert|",
    "pcall|", "xpcall|", "select|", "rawget|", "rawset|", "rawequal|", "rawlen|",
    "collectgarbage|", "dofile|", "load|", "loadfile|", "next|",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "def", "class", "if", "elif", "else", "while", "for", "in", "try",
    "except", "finally", "with", "as", "import", "from", "pass", "return",
    "break", "continue", "lambda", "yield", "global", "nonlocal", "assert",
    "raise", "del", "not", "and", "or", "is", "async", "await", "match", "case",
    "True|", "False|", "None|",
    "self|", "super|", "cls|",
    "int|", "str|", "float|", "list|", "dict|", "tuple|", "set|", "bool|",
    "bytes|", "bytearray|", "complex|", "frozenset|", "object|", "type|",
    "print|", "len|", "range|", "enumerate|", "sorted|", "sum|", "min|", "max|",
    "abs|", "open|", "id|", "input|", "format|", "zip|", "map|", "filter|",
    "any|", "all|", "dir|", "vars|", "locals|", "globals|", "hasattr|",
    "getattr|", "setattr|", "delattr|", "isinstance|", "issubclass|",
    "callable|", "property|", "staticmethod|", "classmethod|", "iter|",
    "next|", "reversed|", "exec|", "eval|", "repr|", "round|", "pow|",
];

const RIDDLE_KEYWORDS: &[&str] = &[
    "var", "val", "for", "while", "continue", "break", "if", "else", "fun",
    "return", "import", "package", "class", "try", "catch", "override",
    "static", "const", "public", "protected", "private", "virtual", "operator",
    "int|", "long|", "double|", "float|", "char|", "void|", "bool|", "short|",
    "true|", "false|", "null|",
];

const STAMON_KEYWORDS: &[&str] = &[
    "class", "def", "extends", "func", "break", "continue", "if", "else",
    "while", "for", "in", "return", "sfn", "new", "null", "import", "true", "false",
];

/// The built-in rule table
pub static BUILTIN_RULES: &[SyntaxRule] = &[
    SyntaxRule {
        filetype: "c",
        extensions: &["c", "h", "cpp", "hpp", "cc", "cxx", "c++"],
        keywords: C_KEYWORDS,
        single_line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        dialect: Dialect::CLike,
    },
    SyntaxRule {
        filetype: "lua",
        extensions: &["lua"],
        keywords: LUA_KEYWORDS,
        single_line_comment: Some("--"),
        block_comment: Some(("--[[", "]]")),
        dialect: Dialect::LuaLike,
    },
    SyntaxRule {
        filetype: "python",
        extensions: &["py", "pyw"],
        keywords: PYTHON_KEYWORDS,
        single_line_comment: Some("#"),
        block_comment: Some(("\"\"\"", "\"\"\"")),
        dialect: Dialect::PythonLike,
    },
    SyntaxRule {
        filetype: "riddle",
        extensions: &["rid"],
        keywords: RIDDLE_KEYWORDS,
        single_line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        dialect: Dialect::RiddleLike,
    },
    SyntaxRule {
        filetype: "stamon",
        extensions: &["st", "stm"],
        keywords: STAMON_KEYWORDS,
        single_line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        dialect: Dialect::RiddleLike,
    },
];

/// Lookup table over a set of rules
#[derive(Debug, Clone, Copy)]
pub struct SyntaxRegistry {
    rules: &'static [SyntaxRule],
}

impl SyntaxRegistry {
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES,
        }
    }

    /// Select a rule by the extension of `path`
    pub fn for_path(&self, path: &Path) -> Option<&'static SyntaxRule> {
        let ext = path.extension()?.to_str()?;
        self.rules.iter().find(|rule| rule.matches_extension(ext))
    }

    pub fn by_filetype(&self, filetype: &str) -> Option<&'static SyntaxRule> {
        self.rules.iter().find(|rule| rule.filetype == filetype)
    }
}

impl Default for SyntaxRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_extension() {
        let registry = SyntaxRegistry::builtin();
        let rule = |p: &str| registry.for_path(Path::new(p)).map(|r| r.filetype);

        assert_eq!(rule("main.c"), Some("c"));
        assert_eq!(rule("src/widget.hpp"), Some("c"));
        assert_eq!(rule("init.lua"), Some("lua"));
        assert_eq!(rule("script.py"), Some("python"));
        assert_eq!(rule("game.rid"), Some("riddle"));
        assert_eq!(rule("demo.stm"), Some("stamon"));
        assert_eq!(rule("notes.txt"), None);
        assert_eq!(rule("Makefile"), None);
    }

    #[test]
    fn test_keyword_classes() {
        let c = SyntaxRegistry::builtin().by_filetype("c").unwrap();
        let int = c.classified_keywords().find(|k| k.text == "int").unwrap();
        assert!(int.is_type);
        let ret = c.classified_keywords().find(|k| k.text == "return").unwrap();
        assert!(!ret.is_type);
        assert!(c.classified_keywords().all(|k| !k.text.ends_with('|')));
    }

    #[test]
    fn test_dialect_hooks() {
        assert!(Dialect::CLike.highlights_calls());
        assert!(Dialect::CLike.has_preprocessor());
        assert!(!Dialect::PythonLike.highlights_calls());
        assert_eq!(Dialect::LuaLike.definition_keywords(), &["function"]);
    }
}
