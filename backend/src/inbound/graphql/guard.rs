//! Query shape guard: static depth and cost validation.
//!
//! Runs over the parsed query document before any resolver executes, wired
//! into the engine as an extension on the parse hook. A violation rejects
//! the whole request; partial execution never happens. The estimated cost
//! of every accepted query is logged.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_graphql::extensions::{Extension, ExtensionContext, ExtensionFactory, NextParseQuery};
use async_graphql::parser::types::{
    ExecutableDocument, FragmentDefinition, Selection, SelectionSet,
};
use async_graphql::{Name, Positioned, ServerError, ServerResult, Variables};
use tracing::info;

/// Maximum nesting of selection sets.
const DEPTH_LIMIT: usize = 5;
/// Hard budget for the estimated query cost.
const COST_BUDGET: u64 = 1000;
/// Weight charged for every selected field.
const FIELD_WEIGHT: u64 = 1;
/// Assumed multiplicity for list-returning fields.
const LIST_FACTOR: u64 = 10;

type Fragments = HashMap<Name, Positioned<FragmentDefinition>>;

/// Limits applied to every incoming query document.
#[derive(Debug, Clone)]
pub struct ShapeGuardConfig {
    pub max_depth: usize,
    pub cost_budget: u64,
    /// Per-field weight summed across the selection tree.
    pub field_weight: u64,
    /// Multiplicity factor applied below list-returning fields.
    pub list_factor: u64,
    /// Names of the schema's list-returning fields.
    pub list_fields: HashSet<String>,
}

impl Default for ShapeGuardConfig {
    fn default() -> Self {
        Self {
            max_depth: DEPTH_LIMIT,
            cost_budget: COST_BUDGET,
            field_weight: FIELD_WEIGHT,
            list_factor: LIST_FACTOR,
            list_fields: ["allPhotos", "allUsers", "postedPhotos", "inPhotos", "taggedUsers"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// Shape violations, surfaced as request-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeViolation {
    #[error("query depth {depth} exceeds the limit of {limit}")]
    DepthExceeded { depth: usize, limit: usize },
    #[error("estimated query cost {cost} exceeds the budget of {budget}")]
    CostExceeded { cost: u64, budget: u64 },
}

/// Validate a parsed document; returns the estimated cost when accepted.
pub fn check(document: &ExecutableDocument, config: &ShapeGuardConfig) -> Result<u64, ShapeViolation> {
    let mut depth = 0;
    let mut cost: u64 = 0;

    for (_name, operation) in document.operations.iter() {
        let root = &operation.node.selection_set.node;
        depth = depth.max(selection_depth(root, &document.fragments, &mut HashSet::new()));
        cost = cost.saturating_add(selection_cost(
            root,
            &document.fragments,
            1,
            config,
            &mut HashSet::new(),
        ));
    }

    if depth > config.max_depth {
        return Err(ShapeViolation::DepthExceeded {
            depth,
            limit: config.max_depth,
        });
    }
    if cost > config.cost_budget {
        return Err(ShapeViolation::CostExceeded {
            cost,
            budget: config.cost_budget,
        });
    }
    Ok(cost)
}

/// Fragment-expanded nesting depth: a leaf field counts one level, a field
/// with a selection set counts one plus its subtree. Fragment cycles are
/// skipped here; the engine's own validation rejects them afterwards.
fn selection_depth(set: &SelectionSet, fragments: &Fragments, active: &mut HashSet<Name>) -> usize {
    set.items
        .iter()
        .map(|selection| match &selection.node {
            Selection::Field(field) => {
                let subtree = &field.node.selection_set.node;
                if subtree.items.is_empty() {
                    1
                } else {
                    1 + selection_depth(subtree, fragments, active)
                }
            }
            Selection::InlineFragment(fragment) => {
                selection_depth(&fragment.node.selection_set.node, fragments, active)
            }
            Selection::FragmentSpread(spread) => {
                let name = &spread.node.fragment_name.node;
                if active.contains(name) {
                    0
                } else {
                    fragments.get(name).map_or(0, |definition| {
                        active.insert(name.clone());
                        let depth =
                            selection_depth(&definition.node.selection_set.node, fragments, active);
                        active.remove(name);
                        depth
                    })
                }
            }
        })
        .max()
        .unwrap_or(0)
}

/// Estimated cost: every field charges `field_weight` times the multiplicity
/// accumulated on the path to it; list-returning fields multiply their
/// subtree by `list_factor`.
fn selection_cost(
    set: &SelectionSet,
    fragments: &Fragments,
    multiplier: u64,
    config: &ShapeGuardConfig,
    active: &mut HashSet<Name>,
) -> u64 {
    set.items
        .iter()
        .map(|selection| match &selection.node {
            Selection::Field(field) => {
                let name = field.node.name.node.as_str();
                let child_multiplier = if config.list_fields.contains(name) {
                    multiplier.saturating_mul(config.list_factor)
                } else {
                    multiplier
                };
                multiplier
                    .saturating_mul(config.field_weight)
                    .saturating_add(selection_cost(
                        &field.node.selection_set.node,
                        fragments,
                        child_multiplier,
                        config,
                        active,
                    ))
            }
            Selection::InlineFragment(fragment) => selection_cost(
                &fragment.node.selection_set.node,
                fragments,
                multiplier,
                config,
                active,
            ),
            Selection::FragmentSpread(spread) => {
                let name = &spread.node.fragment_name.node;
                if active.contains(name) {
                    0
                } else {
                    fragments.get(name).map_or(0, |definition| {
                        active.insert(name.clone());
                        let cost = selection_cost(
                            &definition.node.selection_set.node,
                            fragments,
                            multiplier,
                            config,
                            active,
                        );
                        active.remove(name);
                        cost
                    })
                }
            }
        })
        .fold(0, u64::saturating_add)
}

/// Extension factory installing the guard on every request.
#[derive(Debug, Clone, Default)]
pub struct ShapeGuard {
    config: Arc<ShapeGuardConfig>,
}

impl ShapeGuard {
    pub fn new(config: ShapeGuardConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl ExtensionFactory for ShapeGuard {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(ShapeGuardExtension {
            config: Arc::clone(&self.config),
        })
    }
}

struct ShapeGuardExtension {
    config: Arc<ShapeGuardConfig>,
}

#[async_trait::async_trait]
impl Extension for ShapeGuardExtension {
    async fn parse_query(
        &self,
        ctx: &ExtensionContext<'_>,
        query: &str,
        variables: &Variables,
        next: NextParseQuery<'_>,
    ) -> ServerResult<ExecutableDocument> {
        let document = next.run(ctx, query, variables).await?;
        match check(&document, &self.config) {
            Ok(cost) => {
                info!(cost, "query cost");
                Ok(document)
            }
            Err(violation) => Err(ServerError::new(violation.to_string(), None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_graphql::parser::parse_query;
    use rstest::rstest;

    use super::*;

    fn checked(query: &str) -> Result<u64, ShapeViolation> {
        let document = parse_query(query).expect("query must parse");
        check(&document, &ShapeGuardConfig::default())
    }

    /// `levels` nested selection sets: `{ f { f { ... } } }`.
    fn nested(levels: usize) -> String {
        let mut query = "leaf".to_owned();
        for _ in 1..levels {
            query = format!("f {{ {query} }}");
        }
        format!("{{ {query} }}")
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(5)]
    fn accepts_depth_up_to_the_limit(#[case] levels: usize) {
        assert!(checked(&nested(levels)).is_ok(), "depth {levels} must pass");
    }

    #[rstest]
    #[case(6)]
    #[case(7)]
    fn rejects_depth_beyond_the_limit(#[case] levels: usize) {
        let violation = checked(&nested(levels)).expect_err("depth must be rejected");
        assert_eq!(
            violation,
            ShapeViolation::DepthExceeded {
                depth: levels,
                limit: 5
            }
        );
    }

    #[test]
    fn fragment_spreads_count_toward_depth() {
        // allPhotos > postedBy > postedPhotos > taggedUsers > postedPhotos > name
        let query = r"
            { allPhotos { postedBy { ...owner } } }
            fragment owner on User {
                postedPhotos { taggedUsers { postedPhotos { name } } }
            }
        ";
        let violation = checked(query).expect_err("expanded depth is 6");
        assert!(matches!(violation, ShapeViolation::DepthExceeded { depth: 6, .. }));
    }

    #[test]
    fn fragment_cycles_do_not_recurse_forever() {
        let query = r"
            { allPhotos { ...loop } }
            fragment loop on Photo { taggedUsers { postedPhotos { ...loop } } }
        ";
        // The engine rejects the cycle during validation; the guard only has
        // to terminate and stay within limits.
        let _ = checked(query);
    }

    #[test]
    fn scalar_fields_cost_their_weight() {
        assert_eq!(checked("{ totalPhotos totalUsers }"), Ok(2));
    }

    #[test]
    fn list_fields_multiply_their_subtree() {
        // allUsers: 1, name under it: 10 each.
        assert_eq!(checked("{ allUsers { name avatar } }"), Ok(21));
        // Nested lists compound: allUsers(1) + postedPhotos(10) + name(100).
        assert_eq!(checked("{ allUsers { postedPhotos { name } } }"), Ok(111));
    }

    #[test]
    fn cost_beyond_the_budget_is_rejected() {
        // allUsers(1) + postedPhotos(10) + taggedUsers(100) + two leaves at
        // multiplicity 1000 each.
        let query = "{ allUsers { postedPhotos { taggedUsers { githubLogin name } } } }";
        let violation = checked(query).expect_err("cost 2111 exceeds 1000");
        assert_eq!(
            violation,
            ShapeViolation::CostExceeded {
                cost: 2111,
                budget: 1000
            }
        );
    }

    #[test]
    fn custom_weights_are_honoured() {
        let config = ShapeGuardConfig {
            field_weight: 5,
            list_factor: 2,
            ..ShapeGuardConfig::default()
        };
        let document = parse_query("{ allUsers { name } }").expect("query must parse");
        // allUsers: 5, name: 2 * 5.
        assert_eq!(check(&document, &config), Ok(15));
    }
}
