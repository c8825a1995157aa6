use std::collections::VecDeque;

use rustpython_parser::{Parse, ast};
use serde::Serialize;
use thiserror::Error;

/// Attached to every successful analysis
pub(crate) const EXECUTION_DISABLED: &str =
    "Code execution is disabled for safety. Showing static analysis only.";

const SOURCE_PATH: &str = "<snippet>";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct CodeAnalysis {
    pub(crate) imports: Vec<String>,
    pub(crate) functions: Vec<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) message: String,
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum CodeError {
    #[error("Syntax error: {0}")]
    Syntax(String),
}

/// Nodes that own statement bodies
enum Node<'a> {
    Stmt(&'a ast::Stmt),
    Handler(&'a ast::ExceptHandler),
    Case(&'a ast::MatchCase),
}

/// Parse a snippet and collect import, function and class names.
///
/// The snippet is never executed. Nodes are visited breadth-first, so
/// top-level definitions are listed before nested ones. Repeated names are
/// kept.
pub(crate) fn analyze(source: &str) -> Result<CodeAnalysis, CodeError> {
    let suite = ast::Suite::parse(source, SOURCE_PATH)
        .map_err(|e| CodeError::Syntax(e.to_string()))?;

    let mut analysis = CodeAnalysis {
        message: EXECUTION_DISABLED.to_string(),
        ..CodeAnalysis::default()
    };

    let mut queue: VecDeque<Node<'_>> = suite.iter().map(Node::Stmt).collect();
    while let Some(node) = queue.pop_front() {
        match node {
            Node::Stmt(stmt) => {
                record(stmt, &mut analysis);
                push_children(stmt, &mut queue);
            }
            Node::Handler(ast::ExceptHandler::ExceptHandler(handler)) => {
                queue.extend(handler.body.iter().map(Node::Stmt));
            }
            Node::Case(case) => {
                queue.extend(case.body.iter().map(Node::Stmt));
            }
        }
    }

    Ok(analysis)
}

fn record(stmt: &ast::Stmt, analysis: &mut CodeAnalysis) {
    match stmt {
        ast::Stmt::Import(node) => analysis
            .imports
            .extend(node.names.iter().map(|alias| alias.name.as_str().to_string())),
        ast::Stmt::ImportFrom(node) => {
            if let Some(module) = &node.module {
                analysis.imports.push(module.as_str().to_string());
            }
        }
        ast::Stmt::FunctionDef(node) => analysis.functions.push(node.name.as_str().to_string()),
        ast::Stmt::AsyncFunctionDef(node) => {
            analysis.functions.push(node.name.as_str().to_string())
        }
        ast::Stmt::ClassDef(node) => analysis.classes.push(node.name.as_str().to_string()),
        _ => {}
    }
}

fn push_children<'a>(stmt: &'a ast::Stmt, queue: &mut VecDeque<Node<'a>>) {
    match stmt {
        ast::Stmt::FunctionDef(node) => enqueue_body(queue, &node.body),
        ast::Stmt::AsyncFunctionDef(node) => enqueue_body(queue, &node.body),
        ast::Stmt::ClassDef(node) => enqueue_body(queue, &node.body),
        ast::Stmt::For(node) => {
            enqueue_body(queue, &node.body);
            enqueue_body(queue, &node.orelse);
        }
        ast::Stmt::AsyncFor(node) => {
            enqueue_body(queue, &node.body);
            enqueue_body(queue, &node.orelse);
        }
        ast::Stmt::While(node) => {
            enqueue_body(queue, &node.body);
            enqueue_body(queue, &node.orelse);
        }
        ast::Stmt::If(node) => {
            enqueue_body(queue, &node.body);
            enqueue_body(queue, &node.orelse);
        }
        ast::Stmt::With(node) => enqueue_body(queue, &node.body),
        ast::Stmt::AsyncWith(node) => enqueue_body(queue, &node.body),
        ast::Stmt::Match(node) => queue.extend(node.cases.iter().map(Node::Case)),
        ast::Stmt::Try(node) => {
            enqueue_body(queue, &node.body);
            queue.extend(node.handlers.iter().map(Node::Handler));
            enqueue_body(queue, &node.orelse);
            enqueue_body(queue, &node.finalbody);
        }
        ast::Stmt::TryStar(node) => {
            enqueue_body(queue, &node.body);
            queue.extend(node.handlers.iter().map(Node::Handler));
            enqueue_body(queue, &node.orelse);
            enqueue_body(queue, &node.finalbody);
        }
        _ => {}
    }
}

fn enqueue_body<'a>(queue: &mut VecDeque<Node<'a>>, body: &'a [ast::Stmt]) {
    queue.extend(body.iter().map(Node::Stmt));
}
