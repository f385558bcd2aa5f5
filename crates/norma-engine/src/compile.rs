//! # Compiler
//!
//! Lowers a schema tree, once, into a [`Program`]: a flat arena of blocks,
//! one per schema node, numbered in pre-order by a monotonic counter. Each
//! block holds its rule set with every handler it needs already resolved,
//! and refers to its children by block id. Running a program performs no
//! name lookups and no shorthand lowering.
//!
//! A program captures the handlers registered when it was compiled.
//! Registering a replacement handler afterwards does not change it.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use norma_core::{child_path, DefinitionError, Value, Violation};
use norma_schema::{
    element_path, CheckContext, CheckFn, CheckSpec, LeafSchema, SchemaNode, TransformContext,
    TransformFn, TransformSpec,
};

use crate::handler::{CheckHandler, TransformHandler, TypeHandler};
use crate::options::{ValidateOptions, Validated};
use crate::registry::Registries;
use crate::traverse::{Plan, Traversal};

/// Id of the root block.
const ROOT: usize = 0;

/// A compiled schema.
pub struct Program {
    blocks: Vec<Block>,
}

struct Block {
    leaf: Arc<LeafSchema>,
    /// Handlers for `leaf.types`, position for position.
    types: Vec<Arc<dyn TypeHandler>>,
    properties: Vec<(String, usize)>,
    element: Option<usize>,
    check: CompiledCheck,
    transform: CompiledTransform,
}

enum CompiledCheck {
    None,
    Named(Vec<(Arc<dyn CheckHandler>, Value)>),
    Callback(CheckFn),
}

enum CompiledTransform {
    None,
    Named(Vec<Arc<dyn TransformHandler>>),
    Callback(TransformFn),
}

impl Program {
    /// Lower `schema` against `registries`. Fails if a referenced handler
    /// is not registered.
    pub fn compile(registries: &Registries, schema: &SchemaNode) -> Result<Self, DefinitionError> {
        let mut program = Program {
            blocks: Vec::with_capacity(schema.node_count()),
        };
        program.lower(registries, schema, "")?;
        Ok(program)
    }

    /// Number of blocks, one per schema node.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn run(&self, input: Option<&Value>, options: &ValidateOptions) -> Validated {
        Traversal::run(self, &ROOT, input, options)
    }

    fn lower(
        &mut self,
        registries: &Registries,
        node: &SchemaNode,
        path: &str,
    ) -> Result<usize, DefinitionError> {
        let leaf = match node {
            SchemaNode::Leaf(leaf) => Arc::clone(leaf),
            shorthand => Arc::new(shorthand.rules().into_owned()),
        };
        let types = leaf
            .types
            .iter()
            .map(|name| {
                registries.types.get(name).cloned().ok_or_else(|| DefinitionError::UnknownType {
                    path: path.to_string(),
                    type_name: name.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let check = lower_check(registries, &leaf, path)?;
        let transform = lower_transform(registries, &leaf, path)?;

        let id = self.blocks.len();
        self.blocks.push(Block {
            leaf,
            types,
            properties: Vec::new(),
            element: None,
            check,
            transform,
        });

        let mut properties = Vec::new();
        for (key, child) in node.properties().into_iter().flatten() {
            let child_id = self.lower(registries, child, &child_path(path, key))?;
            properties.push((key.clone(), child_id));
        }
        let element = node
            .element()
            .map(|element| self.lower(registries, element, &element_path(path)))
            .transpose()?;

        let block = &mut self.blocks[id];
        block.properties = properties;
        block.element = element;
        Ok(id)
    }
}

fn lower_check(
    registries: &Registries,
    leaf: &LeafSchema,
    path: &str,
) -> Result<CompiledCheck, DefinitionError> {
    Ok(match &leaf.check {
        None => CompiledCheck::None,
        Some(CheckSpec::Callback(f)) => CompiledCheck::Callback(Arc::clone(f)),
        Some(CheckSpec::Named(checks)) => CompiledCheck::Named(
            checks
                .iter()
                .map(|(name, param)| match registries.checks.get(name) {
                    Some(handler) => Ok((Arc::clone(handler), param.clone())),
                    None => Err(DefinitionError::UnknownCheck {
                        path: path.to_string(),
                        name: name.clone(),
                    }),
                })
                .collect::<Result<_, _>>()?,
        ),
    })
}

fn lower_transform(
    registries: &Registries,
    leaf: &LeafSchema,
    path: &str,
) -> Result<CompiledTransform, DefinitionError> {
    Ok(match &leaf.to {
        None => CompiledTransform::None,
        Some(TransformSpec::Callback(f)) => CompiledTransform::Callback(Arc::clone(f)),
        Some(TransformSpec::Named(names)) => CompiledTransform::Named(
            names
                .iter()
                .map(|name| {
                    registries.transforms.get(name).cloned().ok_or_else(|| {
                        DefinitionError::UnknownTransform {
                            path: path.to_string(),
                            name: name.clone(),
                        }
                    })
                })
                .collect::<Result<_, _>>()?,
        ),
    })
}

impl Plan for Program {
    type Node = usize;

    fn rules<'s>(&'s self, node: &'s usize) -> Cow<'s, LeafSchema> {
        Cow::Borrowed(self.blocks[*node].leaf.as_ref())
    }

    fn type_handler(&self, node: &usize, position: usize, _name: &str) -> Option<&dyn TypeHandler> {
        self.blocks[*node].types.get(position).map(|handler| &**handler)
    }

    fn properties<'s>(&'s self, node: &'s usize) -> Vec<(&'s str, &'s usize)> {
        self.blocks[*node]
            .properties
            .iter()
            .map(|(key, child)| (key.as_str(), child))
            .collect()
    }

    fn element<'s>(&'s self, node: &'s usize) -> Option<&'s usize> {
        self.blocks[*node].element.as_ref()
    }

    fn check(&self, node: &usize, ctx: &CheckContext<'_>, value: &Value) -> Vec<Violation> {
        match &self.blocks[*node].check {
            CompiledCheck::None => Vec::new(),
            CompiledCheck::Callback(f) => f(ctx, value),
            CompiledCheck::Named(checks) => checks
                .iter()
                .flat_map(|(handler, param)| handler.check(ctx, value, param))
                .collect(),
        }
    }

    fn transform(&self, node: &usize, ctx: &TransformContext<'_>, value: Value) -> Value {
        match &self.blocks[*node].transform {
            CompiledTransform::None => value,
            CompiledTransform::Callback(f) => f(ctx, value),
            CompiledTransform::Named(handlers) => handlers
                .iter()
                .fold(value, |value, handler| handler.apply(ctx, value)),
        }
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.blocks.iter().enumerate().map(|(id, block)| {
                format!(
                    "#{id} {} properties={:?} element={:?}",
                    block.leaf.type_list(),
                    block.properties,
                    block.element
                )
            }))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::FnTransform;
    use serde_json::json;

    fn schema() -> SchemaNode {
        SchemaNode::object([
            ("name", LeafSchema::new("string").to("trim").into()),
            (
                "rows",
                SchemaNode::array(SchemaNode::object([("n", LeafSchema::new("number").into())])),
            ),
        ])
    }

    #[test]
    fn test_blocks_are_numbered_in_pre_order() {
        let program = Program::compile(&Registries::with_builtins(), &schema()).unwrap();
        assert_eq!(program.len(), 5);
        let root = &program.blocks[ROOT];
        assert_eq!(
            root.properties,
            vec![("name".to_string(), 1), ("rows".to_string(), 2)]
        );
        assert_eq!(program.blocks[2].element, Some(3));
        assert_eq!(program.blocks[3].properties, vec![("n".to_string(), 4)]);
    }

    #[test]
    fn test_missing_handler_fails_compilation() {
        let schema = SchemaNode::object([("a", LeafSchema::new("string").to("slug").into())]);
        let err = Program::compile(&Registries::with_builtins(), &schema).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::UnknownTransform {
                path: "a".to_string(),
                name: "slug".to_string(),
            }
        );
    }

    #[test]
    fn test_run_matches_schema() {
        let program = Program::compile(&Registries::with_builtins(), &schema()).unwrap();
        let input = Value::from(json!({"name": "  x ", "rows": [{"n": "2"}], "extra": 1}));
        let validated = program.run(Some(&input), &ValidateOptions::default());
        assert!(validated.is_valid());
        assert_eq!(
            validated.output,
            Some(Value::from(json!({"name": "x", "rows": [{"n": 2}]})))
        );
    }

    #[test]
    fn test_program_keeps_handlers_it_was_compiled_with() {
        let mut registries = Registries::with_builtins();
        let program = Program::compile(&registries, &schema()).unwrap();
        registries
            .transforms
            .add("trim", Arc::new(FnTransform::new(|_| Value::from("replaced"))));
        let input = Value::from(json!({"name": " x ", "rows": []}));
        let validated = program.run(Some(&input), &ValidateOptions::default());
        assert_eq!(validated.output, Some(Value::from(json!({"name": "x", "rows": []}))));
    }
}
