/// Regex patterns for Fortran declarations
///
/// All patterns are compiled once at startup using `LazyLock` and are applied
/// to the comment-free code of a logical statement (continuations joined).
///
/// All regexes use case-insensitive + unicode flags
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Build a case-insensitive regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. This is acceptable because all patterns
/// in this module are compile-time constants that are verified by tests.
/// The panic occurs at first access of the `LazyLock` static.
pub(crate) fn build_re(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .unicode(true)
        .build()
        .unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

// Anchor patterns
const EOL_STR: &str = r"\s*$"; // End of statement
const SOL_STR: &str = r"^\s*"; // Start of statement
const NAME_STR: &str = r"[a-z_]\w*";

// Intrinsic and derived type specifications, kind/len selector included
const TYPE_SPEC_STR: &str = r"(?:(?:integer|real|complex|logical|character|double\s*precision|double\s*complex)\b(?:\s*\*\s*\d+)?(?:\s*\((?:[^()]|\([^()]*\))*\))?|(?:type|class)\s*\((?:[^()]|\([^()]*\))*\))";

// Procedure prefixes that do not change the procedure kind
const PROC_PREFIX_STR: &str =
    r"(?:(?:pure|impure|elemental|recursive|non_recursive|module|simple)\b\s*)";

// ===== PROGRAM UNITS =====

// MODULE name
pub static MODULE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}MODULE\s+({NAME_STR}){EOL_STR}")));

// SUBMODULE (ancestor[:parent]) name
pub static SUBMODULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}SUBMODULE\s*\(\s*({NAME_STR})\s*(?::\s*({NAME_STR})\s*)?\)\s*({NAME_STR}){EOL_STR}"
    ))
});

// PROGRAM name
pub static PROGRAM_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}PROGRAM\s+({NAME_STR}){EOL_STR}")));

// ===== SUBPROGRAMS =====

// [prefix...] FUNCTION|SUBROUTINE name [(args)] [suffix]
pub static PROCEDURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}(?:{PROC_PREFIX_STR}|{TYPE_SPEC_STR}\s*)*\b(FUNCTION|SUBROUTINE)\s+({NAME_STR})\s*(?:\(([^()]*)\))?(.*)$"
    ))
});

// What may follow the dummy-argument list: RESULT(...) and BIND(...) clauses
pub static PROC_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"^(?:\s*(?:RESULT|BIND)\s*\([^()]*\))*\s*$"));

pub static RESULT_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"\bRESULT\s*\(\s*({NAME_STR})\s*\)")));

// MODULE PROCEDURE name (separate module procedure body)
pub static SEPARATE_PROC_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}MODULE\s+PROCEDURE\s+({NAME_STR}){EOL_STR}"
    ))
});

// ===== DERIVED TYPES =====

// TYPE[, attrs] :: name[(type params)]
pub static TYPE_DEF_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}TYPE\s*(?:,([^:]*))?::\s*({NAME_STR})\s*(?:\([^()]*\))?{EOL_STR}"
    ))
});

// TYPE name (no double colon)
pub static TYPE_LEGACY_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}TYPE\s+({NAME_STR}){EOL_STR}")));

pub static EXTENDS_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"\bEXTENDS\s*\(\s*({NAME_STR})\s*\)")));

// PROCEDURE[(iface)][, attrs] :: bindings
pub static BINDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}PROCEDURE\s*(?:\(\s*({NAME_STR})?\s*\))?\s*(?:,([^:]*))?::\s*(.+?){EOL_STR}"
    ))
});

// PROCEDURE name (no double colon)
pub static BINDING_SHORT_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}PROCEDURE\s+({NAME_STR}){EOL_STR}")));

// name [=> target]
pub static BINDING_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"^\s*({NAME_STR})\s*(?:=>\s*({NAME_STR}))?{EOL_STR}"
    ))
});

// ===== INTERFACES =====

// [ABSTRACT] INTERFACE [generic-spec]
pub static INTERFACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}(?:ABSTRACT\s+)?INTERFACE(?:\s+({NAME_STR}|OPERATOR\s*\(.*\)|ASSIGNMENT\s*\(.*\)))?{EOL_STR}"
    ))
});

// [MODULE] PROCEDURE [::] name[, name...] (generic interface members)
pub static GENERIC_MEMBERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}(?:MODULE\s+)?PROCEDURE\b\s*(?:::\s*)?({NAME_STR}(?:\s*,\s*{NAME_STR})*){EOL_STR}"
    ))
});

// ===== DECLARATIONS AND STATEMENTS =====

// Statement that starts with a type specification
pub static DECL_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}(?:{TYPE_SPEC_STR}|procedure\s*\((?:[^()]|\([^()]*\))*\))"
    ))
});

pub static INTENT_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"\bINTENT\s*\(\s*(IN\s*OUT|IN|OUT)\s*\)"));

pub static DIMENSION_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\bDIMENSION\s*\("));

// Declared entity: name[(array spec)][*len][= init]
pub static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"^\s*({NAME_STR})\s*(?:\(((?:[^()]|\([^()]*\))*)\))?"
    ))
});

// USE[, nature ::] name
pub static USE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}USE\b\s*(?:,\s*(?:NON_INTRINSIC|INTRINSIC)\s*)?(?:::)?\s*({NAME_STR})"
    ))
});

// CONTAINS
pub static CONTAINS_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}CONTAINS{EOL_STR}")));

// END <kind> [name]
pub static END_KIND_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}END\s*(SUBMODULE|MODULE|PROGRAM|SUBROUTINE|FUNCTION|PROCEDURE|INTERFACE|TYPE)(?:\s+(\S.*?))?{EOL_STR}"
    ))
});

// Generic END (closes the innermost scope)
pub static END_ANY_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}END{EOL_STR}")));

pub static IDENT_RE: LazyLock<Regex> = LazyLock::new(|| build_re(NAME_STR));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_regex() {
        assert!(MODULE_RE.is_match("module my_module"));
        assert!(MODULE_RE.is_match("  MODULE MyModule  "));
        assert!(!MODULE_RE.is_match("module_count = 3"));
        assert!(!MODULE_RE.is_match("module subroutine foo(x)"));
    }

    #[test]
    fn test_submodule_regex() {
        let caps = SUBMODULE_RE.captures("submodule (parent) child").unwrap();
        assert_eq!(&caps[1], "parent");
        assert_eq!(&caps[3], "child");
        let caps = SUBMODULE_RE.captures("SUBMODULE(anc:par) kid").unwrap();
        assert_eq!(&caps[1], "anc");
        assert_eq!(&caps[2], "par");
        assert_eq!(&caps[3], "kid");
    }

    #[test]
    fn test_procedure_regex() {
        assert!(PROCEDURE_RE.is_match("subroutine foo()"));
        assert!(PROCEDURE_RE.is_match("SUBROUTINE bar"));
        assert!(PROCEDURE_RE.is_match("recursive subroutine baz(x, y)"));
        assert!(PROCEDURE_RE.is_match("pure elemental function f(x)"));
        assert!(PROCEDURE_RE.is_match("real(kind=dp) function g(x) result(y)"));
        assert!(PROCEDURE_RE.is_match("type(vector) function add(a, b)"));
        assert!(PROCEDURE_RE.is_match("module function area(self) result(a)"));
        assert!(!PROCEDURE_RE.is_match("call subroutine_x(1)"));
        assert!(!PROCEDURE_RE.is_match("x = my_function(2)"));
    }

    #[test]
    fn test_procedure_captures() {
        let caps = PROCEDURE_RE
            .captures("integer function count(a, b) result(n)")
            .unwrap();
        assert_eq!(caps[1].to_ascii_lowercase(), "function");
        assert_eq!(&caps[2], "count");
        assert_eq!(&caps[3], "a, b");
        assert!(PROC_SUFFIX_RE.is_match(&caps[4]));
        assert_eq!(&RESULT_RE.captures(&caps[4]).unwrap()[1], "n");
    }

    #[test]
    fn test_type_def_regex() {
        assert!(TYPE_DEF_RE.is_match("type :: point"));
        assert!(TYPE_DEF_RE.is_match("type, public :: point"));
        assert!(TYPE_DEF_RE.is_match("type, extends(shape) :: circle"));
        assert!(TYPE_DEF_RE.is_match("type :: matrix(k, n)"));
        assert!(!TYPE_DEF_RE.is_match("type(point) :: p"));
        assert!(TYPE_LEGACY_RE.is_match("type point"));
        assert!(!TYPE_LEGACY_RE.is_match("type is (real)"));
    }

    #[test]
    fn test_binding_regex() {
        let caps = BINDING_RE
            .captures("procedure, pass(self) :: area => circle_area")
            .unwrap();
        assert_eq!(&caps[3], "area => circle_area");
        let caps = BINDING_RE
            .captures("procedure(area_iface), deferred :: area")
            .unwrap();
        assert_eq!(&caps[1], "area_iface");
        assert!(caps[2].contains("deferred"));
    }

    #[test]
    fn test_interface_regex() {
        assert!(INTERFACE_RE.is_match("interface"));
        assert!(INTERFACE_RE.is_match("abstract interface"));
        assert!(INTERFACE_RE.is_match("interface swap"));
        assert!(INTERFACE_RE.is_match("interface operator(+)"));
        assert!(!INTERFACE_RE.is_match("interface_count = 1"));
    }

    #[test]
    fn test_declaration_start() {
        assert!(DECL_START_RE.is_match("integer, intent(in) :: n"));
        assert!(DECL_START_RE.is_match("real(dp), dimension(:) :: x"));
        assert!(DECL_START_RE.is_match("character(len=*), intent(in) :: s"));
        assert!(DECL_START_RE.is_match("type(point), intent(inout) :: p"));
        assert!(DECL_START_RE.is_match("class(shape), intent(in) :: self"));
        assert!(DECL_START_RE.is_match("double precision :: d"));
        assert!(DECL_START_RE.is_match("procedure(cb_iface), pointer :: cb"));
        assert!(!DECL_START_RE.is_match("integer_value = 3"));
        assert!(!DECL_START_RE.is_match("type :: point"));
    }

    #[test]
    fn test_end_regex() {
        let caps = END_KIND_RE.captures("end subroutine foo").unwrap();
        assert_eq!(caps[1].to_ascii_lowercase(), "subroutine");
        assert_eq!(&caps[2], "foo");
        assert!(END_KIND_RE.is_match("ENDMODULE"));
        assert!(END_KIND_RE.is_match("end interface operator(+)"));
        assert!(!END_KIND_RE.is_match("end do"));
        assert!(!END_KIND_RE.is_match("end types"));
        assert!(END_ANY_RE.is_match("  end  "));
    }

    #[test]
    fn test_use_regex() {
        assert_eq!(&USE_RE.captures("use iso_fortran_env").unwrap()[1], "iso_fortran_env");
        assert_eq!(&USE_RE.captures("use, intrinsic :: iso_c_binding").unwrap()[1], "iso_c_binding");
        assert_eq!(&USE_RE.captures("use mod_a, only: f").unwrap()[1], "mod_a");
        assert!(!USE_RE.is_match("user = 1"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(CONTAINS_RE.is_match("CONTAINS"));
        assert!(CONTAINS_RE.is_match("contains"));
        assert!(CONTAINS_RE.is_match("  Contains "));
    }
}
