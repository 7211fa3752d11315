//! Statement execution

use crate::ast::*;
use crate::interpreter::{ControlFlow, Interpreter};
use crate::output::write_line;
use crate::value::{RuntimeError, Value};
use std::rc::Rc;

impl Interpreter {
    /// Execute a statement
    pub(super) fn exec_stmt(&mut self, stmt: &Stmt) -> Result<ControlFlow, RuntimeError> {
        match stmt {
            Stmt::VarDecl(decl) => {
                self.exec_var_decl(decl)?;
                Ok(ControlFlow::Normal)
            }
            Stmt::Assign(assign) => {
                self.exec_assign(assign)?;
                Ok(ControlFlow::Normal)
            }
            Stmt::Visible(visible) => {
                self.exec_visible(visible)?;
                Ok(ControlFlow::Normal)
            }
            Stmt::FuncDef(def) => {
                self.define(&def.name.name, Value::FuncDef(Rc::clone(def)));
                Ok(ControlFlow::Normal)
            }
            Stmt::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval_value(expr)?,
                    None => Value::Noob,
                };
                Ok(ControlFlow::Return(value))
            }
            Stmt::If(if_stmt) => self.exec_if(if_stmt),
            Stmt::ClassDef(class) => {
                self.define(&class.name.name, Value::Class(Rc::clone(class)));
                Ok(ControlFlow::Normal)
            }
            Stmt::Expr(expr_stmt) => {
                self.eval_expr(&expr_stmt.expr)?;
                Ok(ControlFlow::Normal)
            }
        }
    }

    /// Execute statements in order, stopping at the first return
    pub(super) fn exec_block(&mut self, stmts: &[Stmt]) -> Result<ControlFlow, RuntimeError> {
        for stmt in stmts {
            if let ControlFlow::Return(value) = self.exec_stmt(stmt)? {
                return Ok(ControlFlow::Return(value));
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Declare a variable in the current scope
    fn exec_var_decl(&mut self, decl: &VarDecl) -> Result<(), RuntimeError> {
        let name = &decl.name.name;
        if self.declared_here(name) {
            return Err(RuntimeError::DuplicateDeclaration {
                name: name.clone(),
                span: decl.name.span,
            });
        }

        let value = match &decl.init {
            Some(init) => self.eval_value(init)?,
            None => Value::Noob,
        };

        // The initializer may itself have declared the name
        self.declare(name, value, decl.name.span)
    }

    /// Execute an assignment. The value is evaluated before the target.
    fn exec_assign(&mut self, assign: &Assign) -> Result<(), RuntimeError> {
        let value = self.eval_value(&assign.value)?;

        match &assign.target {
            AssignTarget::Name(id) => self.assign(&id.name, value, id.span),
            AssignTarget::Member(member) => {
                let instance = self.eval_instance(&member.object)?;
                instance.set_field(member.member.name.clone(), value);
                Ok(())
            }
            AssignTarget::Index(index) => {
                let (array, position) = self.eval_array_and_index(index)?;
                let position = usize::try_from(position).map_err(|_| RuntimeError::NegativeIndex {
                    index: position,
                    span: index.index.span(),
                })?;
                array.set(position, value);
                Ok(())
            }
        }
    }

    /// Print the space-joined display text of each argument
    fn exec_visible(&mut self, visible: &VisibleStmt) -> Result<(), RuntimeError> {
        let mut parts = Vec::with_capacity(visible.args.len());
        for arg in &visible.args {
            parts.push(self.eval_value(arg)?.to_string());
        }

        write_line(&self.output, &parts.join(" ")).map_err(|message| RuntimeError::Output {
            message,
            span: visible.span,
        })
    }

    /// Execute a conditional. Neither branch opens a scope.
    fn exec_if(&mut self, if_stmt: &IfStmt) -> Result<ControlFlow, RuntimeError> {
        let cond = self.eval_value(&if_stmt.cond)?;

        if cond.is_truthy() {
            self.exec_block(&if_stmt.then_block)
        } else if let Some(else_block) = &if_stmt.else_block {
            self.exec_block(else_block)
        } else {
            Ok(ControlFlow::Normal)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;
    use crate::lexer::Lexer;
    use crate::output::OutputWriter;
    use crate::parser::Parser;
    use crate::value::{RuntimeError, Value};
    use std::sync::{Arc, Mutex};

    fn run(body: &str) -> (Interpreter, Result<(), RuntimeError>) {
        let source = format!("HAI\n{}\nKTHXBYE", body);
        let tokens = Lexer::new(source).tokenize().unwrap();
        let program = Parser::new(tokens).parse().unwrap();
        let sink: OutputWriter = Arc::new(Mutex::new(Box::new(std::io::sink())));
        let mut interp = Interpreter::with_output(sink);
        let result = interp.run(&program);
        (interp, result)
    }

    #[test]
    fn test_var_decl_defaults_to_noob() {
        let (interp, result) = run("I HAS A X");
        result.unwrap();
        assert_eq!(interp.global("X"), Some(Value::Noob));
    }

    #[test]
    fn test_declaration_inside_if_is_visible_afterwards() {
        let (interp, result) = run("O RLY? WIN\nYA RLY\nI HAS A INSIDE ITZ 1\nOIC");
        result.unwrap();
        assert_eq!(interp.global("INSIDE"), Some(Value::Numbr(1)));
    }

    #[test]
    fn test_negative_index_write() {
        let (_, result) = run("I HAS A ARR ITZ BUKKIT\nARR AT -1 R 5");
        assert!(matches!(
            result,
            Err(RuntimeError::NegativeIndex { index: -1, .. })
        ));
    }

    #[test]
    fn test_return_at_top_level() {
        let (_, result) = run("FOUND YR 1");
        assert!(matches!(
            result,
            Err(RuntimeError::ReturnOutsideFunction { .. })
        ));
    }

    #[test]
    fn test_return_inside_top_level_if() {
        let (_, result) = run("O RLY? WIN\nYA RLY\nGTFO\nOIC");
        assert!(matches!(
            result,
            Err(RuntimeError::ReturnOutsideFunction { .. })
        ));
    }

    #[test]
    fn test_function_redefinition_overwrites() {
        let (interp, result) = run("HOW IZ I F\nFOUND YR 1\nIF U SAY SO\nHOW IZ I F\nFOUND YR 2\nIF U SAY SO\nI HAS A R1 ITZ F");
        result.unwrap();
        assert_eq!(interp.global("R1"), Some(Value::Numbr(2)));
    }

    #[test]
    fn test_scope_arena_is_restored_after_calls() {
        let (interp, result) = run("HOW IZ I F YR N\nI HAS A LOCAL ITZ N\nFOUND YR LOCAL\nIF U SAY SO\nF YR 3");
        result.unwrap();
        assert_eq!(interp.scope_depth(), 1);
        assert_eq!(interp.global("LOCAL"), None);
    }
}
