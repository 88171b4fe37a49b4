//! Indented tree rendering of a lowered module, used by `flo ast`.

use crate::ast::{
    ExprArena, ExprId, ExprKind, LiteralPattern, MatchPattern, Module, StmtId, StmtKind, StmtRange,
};
use crate::{Name, StringInterner};

/// Render `module` as an indented tree, one node per line.
pub fn pretty_print(module: &Module, interner: &StringInterner) -> String {
    let mut printer = Printer {
        arena: &module.arena,
        interner,
        out: String::new(),
    };
    printer.line(0, "Module");
    printer.block(module.body, 1);
    printer.out
}

struct Printer<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    out: String,
}

impl Printer<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    fn block(&mut self, range: StmtRange, depth: usize) {
        for &id in self.arena.stmt_list(range) {
            self.stmt(id, depth);
        }
    }

    fn labelled_block(&mut self, label: &str, range: StmtRange, depth: usize) {
        self.line(depth, label);
        self.block(range, depth + 1);
    }

    fn stmt(&mut self, id: StmtId, depth: usize) {
        match self.arena.stmt(id).kind {
            StmtKind::Let { name, init } => self.decl("Let", name, init, depth),
            StmtKind::Var { name, init } => self.decl("Var", name, init, depth),
            StmtKind::Const { name, init } => self.decl("Const", name, init, depth),
            StmtKind::Fn { name, params, body } => {
                let params: Vec<_> = self.arena.params(params).iter().map(|p| self.name(*p)).collect();
                self.line(depth, &format!("Fn {}({})", self.name(name), params.join(", ")));
                self.block(body, depth + 1);
            }
            StmtKind::Return(value) => {
                self.line(depth, "Return");
                if let Some(value) = value {
                    self.expr(value, depth + 1);
                }
            }
            StmtKind::Expr(expr) => self.expr(expr, depth),
            StmtKind::Bind {
                name,
                path,
                version,
                alias,
            } => {
                let mut text = format!("Bind {} ::: {}", self.name(name), self.name(path));
                if let Some(version) = version {
                    text.push('@');
                    text.push_str(self.name(version));
                }
                if let Some(alias) = alias {
                    text.push_str(" as ");
                    text.push_str(self.name(alias));
                }
                self.line(depth, &text);
            }
            StmtKind::RequestCap { capability, alias } => {
                let text = format!("RequestCap {} as {}", self.name(capability), self.name(alias));
                self.line(depth, &text);
            }
        }
    }

    fn decl(&mut self, keyword: &str, name: Name, init: ExprId, depth: usize) {
        self.line(depth, &format!("{keyword} {}", self.name(name)));
        self.expr(init, depth + 1);
    }

    fn expr(&mut self, id: ExprId, depth: usize) {
        let arena = self.arena;
        match &arena.expr(id).kind {
            ExprKind::Int(v) => self.line(depth, &format!("Int {v}")),
            ExprKind::Float(v) => self.line(depth, &format!("Float {v:?}")),
            ExprKind::Str(s) => self.line(depth, &format!("Str {:?}", self.name(*s))),
            ExprKind::Bool(b) => self.line(depth, &format!("Bool {b}")),
            ExprKind::Nil => self.line(depth, "Nil"),
            ExprKind::Ident(name) => self.line(depth, &format!("Ident {}", self.name(*name))),
            ExprKind::Binary { op, left, right } => {
                self.line(depth, &format!("Binary {}", op.as_symbol()));
                self.expr(*left, depth + 1);
                self.expr(*right, depth + 1);
            }
            ExprKind::Unary { op, operand } => {
                self.line(depth, &format!("Unary {}", op.as_symbol()));
                self.expr(*operand, depth + 1);
            }
            ExprKind::Assign { name, value } => {
                self.line(depth, &format!("Assign {}", self.name(*name)));
                self.expr(*value, depth + 1);
            }
            ExprKind::Call { func, args } => {
                self.line(depth, "Call");
                self.expr(*func, depth + 1);
                for &arg in arena.expr_list(*args) {
                    self.expr(arg, depth + 1);
                }
            }
            ExprKind::Index { receiver, index } => {
                self.line(depth, "Index");
                self.expr(*receiver, depth + 1);
                self.expr(*index, depth + 1);
            }
            ExprKind::Field { receiver, name } => {
                self.line(depth, &format!("Field .{}", self.name(*name)));
                self.expr(*receiver, depth + 1);
            }
            ExprKind::OptionalField { receiver, name } => {
                self.line(depth, &format!("OptionalField ?.{}", self.name(*name)));
                self.expr(*receiver, depth + 1);
            }
            ExprKind::List(items) => {
                self.line(depth, "List");
                for &item in arena.expr_list(*items) {
                    self.expr(item, depth + 1);
                }
            }
            ExprKind::Map(entries) => {
                self.line(depth, "Map");
                for entry in arena.entries(*entries) {
                    self.line(depth + 1, "Entry");
                    self.expr(entry.key, depth + 2);
                    self.expr(entry.value, depth + 2);
                }
            }
            ExprKind::If {
                cond,
                then_block,
                elifs,
                else_block,
            } => {
                self.line(depth, "If");
                self.expr(*cond, depth + 1);
                self.labelled_block("Then", *then_block, depth + 1);
                for elif in arena.elifs(*elifs) {
                    self.line(depth + 1, "Elif");
                    self.expr(elif.cond, depth + 2);
                    self.block(elif.body, depth + 2);
                }
                if let Some(block) = else_block {
                    self.labelled_block("Else", *block, depth + 1);
                }
            }
            ExprKind::Match { scrutinee, arms } => {
                self.line(depth, "Match");
                self.expr(*scrutinee, depth + 1);
                for arm in arena.arms(*arms) {
                    let pattern = self.pattern(&arm.pattern);
                    self.line(depth + 1, &format!("Arm {pattern}"));
                    self.block(arm.body, depth + 2);
                }
            }
            ExprKind::For {
                binding,
                iterable,
                body,
            } => {
                self.line(depth, &format!("For {}", self.name(*binding)));
                self.expr(*iterable, depth + 1);
                self.labelled_block("Do", *body, depth + 1);
            }
            ExprKind::While { cond, body } => {
                self.line(depth, "While");
                self.expr(*cond, depth + 1);
                self.labelled_block("Do", *body, depth + 1);
            }
            ExprKind::Attempt {
                body,
                rescue,
                finally,
            } => {
                self.labelled_block("Attempt", *body, depth);
                if let Some(rescue) = rescue {
                    let label = format!("Rescue {}", self.name(rescue.name));
                    self.labelled_block(&label, rescue.body, depth);
                }
                if let Some(block) = finally {
                    self.labelled_block("Finally", *block, depth);
                }
            }
            ExprKind::Lambda { params, body } => {
                let params: Vec<_> = arena.params(*params).iter().map(|p| self.name(*p)).collect();
                self.line(depth, &format!("Lambda({})", params.join(", ")));
                self.block(*body, depth + 1);
            }
            ExprKind::Strand { body } => self.labelled_block("Strand", *body, depth),
            ExprKind::Await(inner) => self.wrapped("Await", *inner, depth),
            ExprKind::Raise(inner) => self.wrapped("Raise", *inner, depth),
            ExprKind::Some(inner) => self.wrapped("Some", *inner, depth),
            ExprKind::None => self.line(depth, "None"),
            ExprKind::Ok(inner) => self.wrapped("Ok", *inner, depth),
            ExprKind::Err(inner) => self.wrapped("Err", *inner, depth),
        }
    }

    fn wrapped(&mut self, label: &str, inner: ExprId, depth: usize) {
        self.line(depth, label);
        self.expr(inner, depth + 1);
    }

    fn pattern(&self, pattern: &MatchPattern) -> String {
        match pattern {
            MatchPattern::Wildcard => "_".to_owned(),
            MatchPattern::Binding(name) => self.name(*name).to_owned(),
            MatchPattern::Literal(lit) => match lit {
                LiteralPattern::Int(v) => v.to_string(),
                LiteralPattern::Float(v) => format!("{v:?}"),
                LiteralPattern::Str(s) => format!("{:?}", self.name(*s)),
                LiteralPattern::Bool(b) => b.to_string(),
                LiteralPattern::Nil => "nil".to_owned(),
            },
            MatchPattern::Variant { tag, inner } => match inner {
                Some(inner) => format!("{}({})", tag.as_str(), self.pattern(inner)),
                None => tag.as_str().to_owned(),
            },
            MatchPattern::List(items) => {
                let items: Vec<_> = items.iter().map(|p| self.pattern(p)).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }
}
