//! Path evaluator for the expression subset the tests exercise.
//!
//! Supported forms: `.`, `*`, `name`, `p:name`, `child::name`, `//name`,
//! `@name`, `@*`, and the `count(…)`, `boolean(…)`, `string(…)`, `name(.)`
//! function calls over those node tests. Node results are yielded in
//! document order. Anything else is rejected with
//! [`EvaluateError::InvalidExpression`] — this is test tooling, not an
//! XPath engine.
//!
//! Unprefixed element name tests resolve against the resolver's default
//! namespace, prefixed ones against the resolver's prefix table; unprefixed
//! attribute tests are in no namespace.

use std::sync::Arc;

use domx_core::{
    EvaluateError, HostDocument, HostNode, HostNodeKind, NamespaceResolver, PathEvaluator,
    QueryResult,
};

#[derive(Default)]
pub struct MockEvaluator;

impl MockEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl PathEvaluator for MockEvaluator {
    fn evaluate_ordered(
        &self,
        expression: &str,
        document: &Arc<dyn HostDocument>,
        context: &Arc<dyn HostNode>,
        resolver: &dyn NamespaceResolver,
    ) -> Result<QueryResult, EvaluateError> {
        let expr = expression.trim();

        if let Some(inner) = call_argument(expr, "count") {
            let nodes = node_set(expression, inner, document, context, resolver)?;
            #[allow(clippy::cast_precision_loss)]
            return Ok(QueryResult::Number(nodes.len() as f64));
        }
        if let Some(inner) = call_argument(expr, "boolean") {
            let nodes = node_set(expression, inner, document, context, resolver)?;
            return Ok(QueryResult::Boolean(!nodes.is_empty()));
        }
        if let Some(inner) = call_argument(expr, "string") {
            let nodes = node_set(expression, inner, document, context, resolver)?;
            return Ok(QueryResult::String(
                nodes.first().map(|node| string_value(node)).unwrap_or_default(),
            ));
        }
        if expr == "name()" || expr == "name(.)" {
            return Ok(QueryResult::String(context.local_name().unwrap_or_default()));
        }

        node_set(expression, expr, document, context, resolver).map(QueryResult::Nodes)
    }
}

enum NameTest {
    Any,
    Named { namespace: Option<String>, local: String },
}

impl NameTest {
    fn matches(&self, namespace: Option<&str>, local: Option<&str>) -> bool {
        match self {
            NameTest::Any => true,
            NameTest::Named { namespace: expected_ns, local: expected_local } => {
                namespace == expected_ns.as_deref() && local == Some(expected_local.as_str())
            }
        }
    }
}

fn node_set(
    expression: &str,
    step: &str,
    document: &Arc<dyn HostDocument>,
    context: &Arc<dyn HostNode>,
    resolver: &dyn NamespaceResolver,
) -> Result<Vec<Arc<dyn HostNode>>, EvaluateError> {
    let step = step.trim();

    if step == "." {
        return Ok(vec![Arc::clone(context)]);
    }

    if let Some(test) = step.strip_prefix("//") {
        let test = element_test(expression, test, resolver)?;
        let mut out = Vec::new();
        collect_descendants(&document.as_node(), &test, &mut out);
        return Ok(out);
    }

    if let Some(test) = step.strip_prefix('@') {
        let test = attribute_test(expression, test, resolver)?;
        return Ok(context
            .attributes()
            .into_iter()
            .filter(|attr| {
                test.matches(attr.namespace_uri().as_deref(), attr.local_name().as_deref())
            })
            .collect());
    }

    let test = element_test(expression, step.strip_prefix("child::").unwrap_or(step), resolver)?;
    Ok(context
        .children()
        .into_iter()
        .filter(|child| {
            child.kind() == HostNodeKind::Element
                && test.matches(child.namespace_uri().as_deref(), child.local_name().as_deref())
        })
        .collect())
}

fn collect_descendants(node: &Arc<dyn HostNode>, test: &NameTest, out: &mut Vec<Arc<dyn HostNode>>) {
    for child in node.children() {
        if child.kind() == HostNodeKind::Element
            && test.matches(child.namespace_uri().as_deref(), child.local_name().as_deref())
        {
            out.push(Arc::clone(&child));
        }
        collect_descendants(&child, test, out);
    }
}

fn element_test(
    expression: &str,
    test: &str,
    resolver: &dyn NamespaceResolver,
) -> Result<NameTest, EvaluateError> {
    if test == "*" {
        return Ok(NameTest::Any);
    }
    match test.split_once(':') {
        Some((prefix, local)) => {
            check_name(expression, prefix)?;
            check_name(expression, local)?;
            let namespace = resolver.lookup_namespace_uri(Some(prefix)).ok_or_else(|| {
                EvaluateError::InvalidExpression {
                    expression: expression.to_owned(),
                    message: format!("undeclared namespace prefix `{prefix}`"),
                }
            })?;
            Ok(NameTest::Named { namespace: Some(namespace), local: local.to_owned() })
        }
        None => {
            check_name(expression, test)?;
            Ok(NameTest::Named {
                namespace: resolver.lookup_namespace_uri(None),
                local: test.to_owned(),
            })
        }
    }
}

fn attribute_test(
    expression: &str,
    test: &str,
    resolver: &dyn NamespaceResolver,
) -> Result<NameTest, EvaluateError> {
    if test == "*" {
        return Ok(NameTest::Any);
    }
    match test.split_once(':') {
        Some((prefix, local)) => {
            check_name(expression, prefix)?;
            check_name(expression, local)?;
            let namespace = resolver.lookup_namespace_uri(Some(prefix)).ok_or_else(|| {
                EvaluateError::InvalidExpression {
                    expression: expression.to_owned(),
                    message: format!("undeclared namespace prefix `{prefix}`"),
                }
            })?;
            Ok(NameTest::Named { namespace: Some(namespace), local: local.to_owned() })
        }
        // Unprefixed attributes live in no namespace.
        None => {
            check_name(expression, test)?;
            Ok(NameTest::Named { namespace: None, local: test.to_owned() })
        }
    }
}

fn check_name(expression: &str, name: &str) -> Result<(), EvaluateError> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(EvaluateError::InvalidExpression {
            expression: expression.to_owned(),
            message: format!("unsupported step `{name}`"),
        })
    }
}

fn call_argument<'a>(expr: &'a str, function: &str) -> Option<&'a str> {
    expr.strip_prefix(function)?.strip_prefix('(')?.strip_suffix(')')
}

fn string_value(node: &Arc<dyn HostNode>) -> String {
    match node.kind() {
        HostNodeKind::Element | HostNodeKind::Document | HostNodeKind::DocumentFragment => {
            let mut out = String::new();
            collect_text(node, &mut out);
            out
        }
        _ => node.node_value().unwrap_or_default(),
    }
}

fn collect_text(node: &Arc<dyn HostNode>, out: &mut String) {
    for child in node.children() {
        match child.kind() {
            HostNodeKind::Text => out.push_str(&child.node_value().unwrap_or_default()),
            HostNodeKind::Element => collect_text(&child, out),
            _ => {}
        }
    }
}
