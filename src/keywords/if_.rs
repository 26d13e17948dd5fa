use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{no_error, ErrorIterator, ValidationErrors},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{SchemaNode, Validate},
    value::{JsonValue, Object},
};
use std::{fmt, sync::Arc};

/// The `if`/`then`/`else` conditional. Compiled from the `if` keyword with
/// its siblings; `then`/`else` without `if` are ignored entirely.
pub(crate) struct IfThenElseValidator {
    condition: Arc<SchemaNode>,
    then_branch: Option<Arc<SchemaNode>>,
    else_branch: Option<Arc<SchemaNode>>,
}

impl IfThenElseValidator {
    #[inline]
    pub(crate) fn compile(
        parent: &Object,
        schema: &JsonValue,
        context: &CompilationContext,
    ) -> CompilationResult {
        let mut errors = ValidationErrors::default();
        let condition_context = context.with_path("if");
        let condition = match compile_validators(schema, &condition_context) {
            Ok(node) => Some(node),
            Err(child_errors) => {
                errors.extend(child_errors);
                None
            }
        };
        let mut compile_branch = |keyword: &str| match parent.get(keyword) {
            Some(branch) => {
                let branch_context = context.with_path(keyword);
                match compile_validators(branch, &branch_context) {
                    Ok(node) => Some(node),
                    Err(child_errors) => {
                        errors.extend(child_errors);
                        None
                    }
                }
            }
            None => None,
        };
        let then_branch = compile_branch("then");
        let else_branch = compile_branch("else");
        if errors.is_empty() {
            Ok(Box::new(IfThenElseValidator {
                condition: condition.expect("no errors means the condition compiled"),
                then_branch,
                else_branch,
            }))
        } else {
            Err(errors)
        }
    }
}

impl Validate for IfThenElseValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        if self.condition.is_valid(schema, instance) {
            self.then_branch
                .as_ref()
                .map_or(true, |node| node.is_valid(schema, instance))
        } else {
            self.else_branch
                .as_ref()
                .map_or(true, |node| node.is_valid(schema, instance))
        }
    }

    fn validate(
        &self,
        schema: &JsonSchema,
        instance: &JsonValue,
        instance_path: &InstancePath,
    ) -> ErrorIterator {
        let branch = if self.condition.is_valid(schema, instance) {
            &self.then_branch
        } else {
            &self.else_branch
        };
        match branch {
            Some(node) => node.validate(schema, instance, instance_path),
            None => no_error(),
        }
    }
}

impl fmt::Display for IfThenElseValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if: {}", self.condition)?;
        if let Some(node) = &self.then_branch {
            write!(f, ", then: {}", node)?;
        }
        if let Some(node) = &self.else_branch {
            write!(f, ", else: {}", node)?;
        }
        Ok(())
    }
}

#[inline]
pub(crate) fn compile(
    parent: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    Some(IfThenElseValidator::compile(parent, schema, context))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    const SCHEMA: &str = r#"{
        "if": {"type": "integer"},
        "then": {"minimum": 0},
        "else": {"type": "string"}
    }"#;

    #[test_case(SCHEMA, "3"; "condition holds and then holds")]
    #[test_case(SCHEMA, "\"s\""; "condition fails and else holds")]
    #[test_case(r#"{"if": {"type": "integer"}}"#, "null"; "bare if asserts nothing")]
    #[test_case(r#"{"then": {"minimum": 10}}"#, "1"; "then without if is ignored")]
    #[test_case(r#"{"if": {"type": "integer"}, "then": {"minimum": 0}}"#, "1.5"; "no else branch")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(SCHEMA, "-1"; "condition holds and then fails")]
    #[test_case(SCHEMA, "1.5"; "condition fails and else fails")]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }
}
