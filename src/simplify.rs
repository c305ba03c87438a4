//! Read-only convenience queries over parsed trees.

use crate::ast::{Block, BodyDecl, CompilationUnit, ModifierFlags};

/// Finds the body of the entry-point method: the first member across the
/// unit's top-level types that is a method named `main`, carries both
/// `public` and `static`, and returns `void`. Abstract and native
/// methods have no body, so they yield `None` even when they match.
pub fn find_main_body(unit: &CompilationUnit) -> Option<&Block> {
    for decl in &unit.types {
        for member in decl.body_declarations() {
            let method = match member {
                BodyDecl::MethodDeclaration(method) => method,
                _ => continue,
            };
            if method.constructor || method.name.identifier != "main" {
                continue;
            }
            let flags = ModifierFlags::of(&method.modifiers);
            if !flags.contains(ModifierFlags::PUBLIC | ModifierFlags::STATIC) {
                continue;
            }
            if !method.return_type2.as_ref().map_or(false, |t| t.is_void()) {
                continue;
            }
            return method.body.as_ref();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse;

    #[test]
    fn test_finds_main_body() {
        let source = b"class A {\npublic static void main(String[] args) {\nint a = 1;\n}\n}\n";
        let unit = parse(source).unwrap();
        let body = find_main_body(&unit).unwrap();
        assert_eq!(body.statements.len(), 1);
    }

    #[test]
    fn test_rejects_wrong_signature() {
        for source in [
            &b"class A {\nstatic void main(String[] args) { }\n}\n"[..],
            &b"class A {\npublic static int main(String[] args) { return 0; }\n}\n"[..],
            &b"class A {\npublic void main(String[] args) { }\n}\n"[..],
            &b"class A {\npublic static void run(String[] args) { }\n}\n"[..],
        ] {
            let unit = parse(source).unwrap();
            assert!(find_main_body(&unit).is_none(), "source {:?}", source);
        }
    }

    #[test]
    fn test_scans_past_other_members() {
        let source = b"class A {\nint x;\nA() { }\npublic static void main(String[] a) { }\n}\n";
        let unit = parse(source).unwrap();
        assert!(find_main_body(&unit).is_some());
    }
}
