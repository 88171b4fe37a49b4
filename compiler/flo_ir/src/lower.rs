//! Lowering from the owned syntax tree into the arena AST.
//!
//! Children are always lowered before their parent's list is pushed, so
//! every range in the arena is contiguous.

use rustc_hash::FxHashSet;

use crate::ast::{
    ElifBranch, Expr, ExprArena, ExprId, ExprKind, LiteralPattern, MapEntry, MatchArm,
    MatchPattern, Module, ParamRange, RescueClause, Stmt, StmtId, StmtKind, StmtRange, VariantTag,
};
use crate::syntax::{SyntaxExpr, SyntaxModule, SyntaxPattern, SyntaxStmt};
use crate::{Name, Span, StringInterner};

/// Structural problems found while lowering.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum LowerError {
    #[error("empty identifier in {context} at {span}")]
    EmptyIdentifier { context: &'static str, span: Span },

    #[error("parameter `{name}` declared twice at {span}")]
    DuplicateParameter { name: String, span: Span },

    #[error("pattern binds `{name}` more than once at {span}")]
    DuplicatePatternBinding { name: String, span: Span },
}

/// Lower a syntax module into a frozen arena.
pub fn lower_module(module: &SyntaxModule, interner: &StringInterner) -> Result<Module, LowerError> {
    let mut lowerer = Lowerer {
        arena: ExprArena::new(),
        interner,
    };
    let body = lowerer.lower_block(&module.body, Span::DUMMY)?;
    Ok(Module::new(lowerer.arena, body))
}

struct Lowerer<'a> {
    arena: ExprArena,
    interner: &'a StringInterner,
}

impl Lowerer<'_> {
    fn ident(&self, name: &str, context: &'static str, span: Span) -> Result<Name, LowerError> {
        if name.is_empty() {
            return Err(LowerError::EmptyIdentifier { context, span });
        }
        Ok(self.interner.intern(name))
    }

    fn lower_block(&mut self, stmts: &[SyntaxStmt], span: Span) -> Result<StmtRange, LowerError> {
        let mut ids: Vec<StmtId> = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            ids.push(self.lower_stmt(stmt, span)?);
        }
        Ok(self.arena.alloc_stmt_list(ids))
    }

    fn lower_params(&mut self, params: &[String], span: Span) -> Result<ParamRange, LowerError> {
        let mut seen = FxHashSet::default();
        let mut names = Vec::with_capacity(params.len());
        for param in params {
            let name = self.ident(param, "parameter list", span)?;
            if !seen.insert(name) {
                return Err(LowerError::DuplicateParameter {
                    name: param.clone(),
                    span,
                });
            }
            names.push(name);
        }
        Ok(self.arena.alloc_params(names))
    }

    fn lower_stmt(&mut self, stmt: &SyntaxStmt, span: Span) -> Result<StmtId, LowerError> {
        let kind = match stmt {
            SyntaxStmt::Spanned { span, stmt } => return self.lower_stmt(stmt, *span),
            SyntaxStmt::Let { name, value } => StmtKind::Let {
                name: self.ident(name, "let", span)?,
                init: self.lower_expr(value, span)?,
            },
            SyntaxStmt::Var { name, value } => StmtKind::Var {
                name: self.ident(name, "var", span)?,
                init: self.lower_expr(value, span)?,
            },
            SyntaxStmt::Const { name, value } => StmtKind::Const {
                name: self.ident(name, "const", span)?,
                init: self.lower_expr(value, span)?,
            },
            SyntaxStmt::Fn { name, params, body } => StmtKind::Fn {
                name: self.ident(name, "fn", span)?,
                params: self.lower_params(params, span)?,
                body: self.lower_block(body, span)?,
            },
            SyntaxStmt::Return { value } => StmtKind::Return(match value {
                Some(value) => Some(self.lower_expr(value, span)?),
                None => None,
            }),
            SyntaxStmt::Expr { expr } => StmtKind::Expr(self.lower_expr(expr, span)?),
            SyntaxStmt::Bind {
                name,
                path,
                version,
                alias,
            } => StmtKind::Bind {
                name: self.ident(name, "bind", span)?,
                path: self.ident(path, "bind path", span)?,
                version: version.as_deref().map(|v| self.interner.intern(v)),
                alias: match alias {
                    Some(alias) => Some(self.ident(alias, "bind alias", span)?),
                    None => None,
                },
            },
            SyntaxStmt::RequestCap { capability, alias } => StmtKind::RequestCap {
                capability: self.ident(capability, "request cap", span)?,
                alias: self.ident(alias, "request cap alias", span)?,
            },
        };
        Ok(self.arena.alloc_stmt(Stmt::new(kind, span)))
    }

    fn lower_expr(&mut self, expr: &SyntaxExpr, span: Span) -> Result<ExprId, LowerError> {
        let kind = match expr {
            SyntaxExpr::Spanned { span, expr } => return self.lower_expr(expr, *span),
            SyntaxExpr::Int { value } => ExprKind::Int(*value),
            SyntaxExpr::Float { value } => ExprKind::Float(*value),
            SyntaxExpr::Str { value } => ExprKind::Str(self.interner.intern(value)),
            SyntaxExpr::Bool { value } => ExprKind::Bool(*value),
            SyntaxExpr::Nil => ExprKind::Nil,
            SyntaxExpr::Ident { name } => ExprKind::Ident(self.ident(name, "identifier", span)?),
            SyntaxExpr::Binary { op, left, right } => ExprKind::Binary {
                op: *op,
                left: self.lower_expr(left, span)?,
                right: self.lower_expr(right, span)?,
            },
            SyntaxExpr::Unary { op, operand } => ExprKind::Unary {
                op: *op,
                operand: self.lower_expr(operand, span)?,
            },
            SyntaxExpr::Assign { name, value } => ExprKind::Assign {
                name: self.ident(name, "assignment", span)?,
                value: self.lower_expr(value, span)?,
            },
            SyntaxExpr::Call { func, args } => {
                let func = self.lower_expr(func, span)?;
                let args = self.lower_expr_list(args, span)?;
                ExprKind::Call {
                    func,
                    args: self.arena.alloc_expr_list(args),
                }
            }
            SyntaxExpr::Index { receiver, index } => ExprKind::Index {
                receiver: self.lower_expr(receiver, span)?,
                index: self.lower_expr(index, span)?,
            },
            SyntaxExpr::Field { receiver, name } => ExprKind::Field {
                receiver: self.lower_expr(receiver, span)?,
                name: self.ident(name, "field access", span)?,
            },
            SyntaxExpr::OptionalField { receiver, name } => ExprKind::OptionalField {
                receiver: self.lower_expr(receiver, span)?,
                name: self.ident(name, "optional chain", span)?,
            },
            SyntaxExpr::List { items } => {
                let items = self.lower_expr_list(items, span)?;
                ExprKind::List(self.arena.alloc_expr_list(items))
            }
            SyntaxExpr::Map { entries } => {
                let mut lowered = Vec::with_capacity(entries.len());
                for entry in entries {
                    lowered.push(MapEntry {
                        key: self.lower_expr(&entry.key, span)?,
                        value: self.lower_expr(&entry.value, span)?,
                    });
                }
                ExprKind::Map(self.arena.alloc_entries(lowered))
            }
            SyntaxExpr::If {
                cond,
                then,
                elifs,
                else_block,
            } => {
                let cond = self.lower_expr(cond, span)?;
                let then_block = self.lower_block(then, span)?;
                let mut branches = Vec::with_capacity(elifs.len());
                for elif in elifs {
                    branches.push(ElifBranch {
                        cond: self.lower_expr(&elif.cond, span)?,
                        body: self.lower_block(&elif.body, span)?,
                    });
                }
                let else_block = match else_block {
                    Some(block) => Some(self.lower_block(block, span)?),
                    None => None,
                };
                ExprKind::If {
                    cond,
                    then_block,
                    elifs: self.arena.alloc_elifs(branches),
                    else_block,
                }
            }
            SyntaxExpr::Match { scrutinee, arms } => {
                let scrutinee = self.lower_expr(scrutinee, span)?;
                let mut lowered = Vec::with_capacity(arms.len());
                for arm in arms {
                    let pattern = self.lower_pattern(&arm.pattern, span)?;
                    check_unique_bindings(&pattern, self.interner, span)?;
                    lowered.push(MatchArm {
                        pattern,
                        body: self.lower_block(&arm.body, span)?,
                        span,
                    });
                }
                ExprKind::Match {
                    scrutinee,
                    arms: self.arena.alloc_arms(lowered),
                }
            }
            SyntaxExpr::For {
                binding,
                iterable,
                body,
            } => ExprKind::For {
                binding: self.ident(binding, "for binding", span)?,
                iterable: self.lower_expr(iterable, span)?,
                body: self.lower_block(body, span)?,
            },
            SyntaxExpr::While { cond, body } => ExprKind::While {
                cond: self.lower_expr(cond, span)?,
                body: self.lower_block(body, span)?,
            },
            SyntaxExpr::Attempt {
                body,
                rescue,
                finally,
            } => {
                let body = self.lower_block(body, span)?;
                let rescue = match rescue {
                    Some(clause) => Some(RescueClause {
                        name: self.ident(&clause.name, "rescue", span)?,
                        body: self.lower_block(&clause.body, span)?,
                    }),
                    None => None,
                };
                let finally = match finally {
                    Some(block) => Some(self.lower_block(block, span)?),
                    None => None,
                };
                ExprKind::Attempt {
                    body,
                    rescue,
                    finally,
                }
            }
            SyntaxExpr::Lambda { params, body } => ExprKind::Lambda {
                params: self.lower_params(params, span)?,
                body: self.lower_block(body, span)?,
            },
            SyntaxExpr::Strand { body } => ExprKind::Strand {
                body: self.lower_block(body, span)?,
            },
            SyntaxExpr::Await { value } => ExprKind::Await(self.lower_expr(value, span)?),
            SyntaxExpr::Raise { value } => ExprKind::Raise(self.lower_expr(value, span)?),
            SyntaxExpr::Some { value } => ExprKind::Some(self.lower_expr(value, span)?),
            SyntaxExpr::None => ExprKind::None,
            SyntaxExpr::Ok { value } => ExprKind::Ok(self.lower_expr(value, span)?),
            SyntaxExpr::Err { value } => ExprKind::Err(self.lower_expr(value, span)?),
        };
        Ok(self.arena.alloc_expr(Expr::new(kind, span)))
    }

    fn lower_expr_list(
        &mut self,
        exprs: &[SyntaxExpr],
        span: Span,
    ) -> Result<Vec<ExprId>, LowerError> {
        exprs.iter().map(|e| self.lower_expr(e, span)).collect()
    }

    fn lower_pattern(&self, pattern: &SyntaxPattern, span: Span) -> Result<MatchPattern, LowerError> {
        let variant = |tag, inner: Option<&SyntaxPattern>| -> Result<MatchPattern, LowerError> {
            Ok(MatchPattern::Variant {
                tag,
                inner: match inner {
                    Some(inner) => Some(Box::new(self.lower_pattern(inner, span)?)),
                    None => None,
                },
            })
        };
        Ok(match pattern {
            SyntaxPattern::Wildcard => MatchPattern::Wildcard,
            SyntaxPattern::Binding { name } if name == "_" => MatchPattern::Wildcard,
            SyntaxPattern::Binding { name } => {
                MatchPattern::Binding(self.ident(name, "pattern", span)?)
            }
            SyntaxPattern::Int { value } => MatchPattern::Literal(LiteralPattern::Int(*value)),
            SyntaxPattern::Float { value } => MatchPattern::Literal(LiteralPattern::Float(*value)),
            SyntaxPattern::Str { value } => {
                MatchPattern::Literal(LiteralPattern::Str(self.interner.intern(value)))
            }
            SyntaxPattern::Bool { value } => MatchPattern::Literal(LiteralPattern::Bool(*value)),
            SyntaxPattern::Nil => MatchPattern::Literal(LiteralPattern::Nil),
            SyntaxPattern::Some { inner } => variant(VariantTag::Some, Some(&**inner))?,
            SyntaxPattern::None => variant(VariantTag::None, None)?,
            SyntaxPattern::Ok { inner } => variant(VariantTag::Ok, Some(&**inner))?,
            SyntaxPattern::Err { inner } => variant(VariantTag::Err, Some(&**inner))?,
            SyntaxPattern::List { items } => MatchPattern::List(
                items
                    .iter()
                    .map(|item| self.lower_pattern(item, span))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

fn check_unique_bindings(
    pattern: &MatchPattern,
    interner: &StringInterner,
    span: Span,
) -> Result<(), LowerError> {
    let mut seen = FxHashSet::default();
    for name in pattern.bindings() {
        if !seen.insert(name) {
            return Err(LowerError::DuplicatePatternBinding {
                name: interner.lookup(name).to_owned(),
                span,
            });
        }
    }
    Ok(())
}
