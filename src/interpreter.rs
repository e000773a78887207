use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::mem;
use std::rc::Rc;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::{Diagnostics, Report, RuntimeError, Unwind};
use crate::expr::{Expr, ExprVisitor};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::{Token, Type};

type EvalResult = Result<Object, RuntimeError>;
type ExecResult = Result<(), Unwind>;

/// The tree-walking evaluator. Expressions produce an [`Object`]; statements
/// produce side effects on the environment chain and the output writer.
pub struct Interpreter<'a> {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<usize, usize>, // token serial -> scope distance
    output: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(output: &'a mut dyn Write) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::get_globals() {
            globals.borrow_mut().define(native.name, Object::from(native));
        }

        Interpreter {
            globals: Rc::clone(&globals),
            environment: globals,
            locals: HashMap::new(),
            output,
        }
    }

    /// Executes the top-level statements in order. A runtime error reports
    /// itself and aborts the rest of the run.
    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        for statement in statements {
            if let Err(unwind) = self.execute(statement) {
                match unwind {
                    Unwind::Error(error) => error.report(diagnostics),
                    Unwind::Return(_) => unreachable!("top-level return is rejected during resolution"),
                }
                break;
            }
        }
    }

    /// Records the scope distance of a variable reference. Called by the
    /// resolver before interpretation starts.
    pub fn resolve(&mut self, name: &Token, depth: usize) {
        self.locals.insert(name.serial(), depth);
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        expr.accept(self)
    }

    /// Executes the statements under the given environment, restoring the
    /// previous environment on every exit path, return unwinds and runtime
    /// errors included.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> ExecResult {
        let previous = mem::replace(&mut self.environment, environment);
        let result = statements.iter().try_for_each(|statement| self.execute(statement));
        self.environment = previous;

        result
    }

    /// Looks a variable up at its resolved distance, or in the globals when
    /// the resolver left it unresolved.
    fn look_up_variable(&self, name: &Token) -> EvalResult {
        match self.locals.get(&name.serial()) {
            Some(distance) => self.environment.borrow().get_at(*distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    /// Checks the argument count against the callable's arity and dispatches.
    fn invoke(&mut self, callable: &dyn Callable, paren: &Token, arguments: Vec<Object>) -> EvalResult {
        if arguments.len() != callable.arity() {
            return Err(RuntimeError {
                token: paren.clone(),
                message: format!("Expected {} arguments but got {}.", callable.arity(), arguments.len()),
            });
        }

        callable.call(self, arguments)
    }
}

fn number_operands(operator: &Token, left: &Object, right: &Object) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Object::Literal(Literal::Number(left)), Object::Literal(Literal::Number(right))) => {
            Ok((*left, *right))
        },
        _ => Err(RuntimeError {
            token: operator.clone(),
            message: "Operands must be numbers.".to_string(),
        }),
    }
}

impl ExprVisitor<EvalResult> for Interpreter<'_> {
    fn visit_literal_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Literal(literal) = expr else { unreachable!() };

        Ok(Object::from(literal.clone()))
    }

    fn visit_logical_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Logical(logical) = expr else { unreachable!() };

        let left = self.evaluate(&logical.left)?;

        // Short-circuits yield the original operand, not a coerced boolean.
        match logical.operator.r#type {
            Type::Or if left.as_bool() => Ok(left),
            Type::And if !left.as_bool() => Ok(left),
            _ => self.evaluate(&logical.right),
        }
    }

    fn visit_unary_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Unary(unary) = expr else { unreachable!() };

        let right = self.evaluate(&unary.expr)?;

        match unary.operator.r#type {
            // Negation is overloaded: numbers negate, strings reverse and
            // booleans invert.
            Type::Minus => (-right).ok_or_else(|| RuntimeError {
                token: unary.operator.clone(),
                message: "Operand must be a number, a string, or a boolean.".to_string(),
            }),
            Type::Bang => Ok(Object::from(!right.as_bool())),
            _ => unreachable!(),
        }
    }

    fn visit_binary_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Binary(binary) = expr else { unreachable!() };

        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;

        match binary.operator.r#type {
            Type::Plus => (left + right).ok_or_else(|| RuntimeError {
                token: binary.operator.clone(),
                message: "Operands must be two numbers or two strings.".to_string(),
            }),
            Type::Minus => (left - right).ok_or_else(|| RuntimeError {
                token: binary.operator.clone(),
                message: "Operands must be numbers.".to_string(),
            }),
            Type::Star => (left * right).ok_or_else(|| RuntimeError {
                token: binary.operator.clone(),
                message: "Operands must be numbers.".to_string(),
            }),
            Type::Slash => (left / right).ok_or_else(|| RuntimeError {
                token: binary.operator.clone(),
                message: "Operands must be numbers.".to_string(),
            }),
            Type::Greater | Type::GreaterEqual | Type::Less | Type::LessEqual => {
                let (left, right) = number_operands(&binary.operator, &left, &right)?;

                let result = match binary.operator.r#type {
                    Type::Greater => left > right,
                    Type::GreaterEqual => left >= right,
                    Type::Less => left < right,
                    Type::LessEqual => left <= right,
                    _ => unreachable!(),
                };

                Ok(Object::from(result))
            },
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!(),
        }
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Grouping(grouping) = expr else { unreachable!() };

        self.evaluate(&grouping.expr)
    }

    fn visit_variable_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Variable(variable) = expr else { unreachable!() };

        self.look_up_variable(&variable.name)
    }

    fn visit_assign_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Assign(assign) = expr else { unreachable!() };

        let value = self.evaluate(&assign.value)?;

        match self.locals.get(&assign.name.serial()) {
            Some(distance) => {
                self.environment.borrow_mut().assign_at(*distance, &assign.name, value.clone());
            },
            None => {
                self.globals.borrow_mut().assign(&assign.name, value.clone())?;
            },
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Call(call) = expr else { unreachable!() };

        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        match &callee {
            Object::Function(function) => self.invoke(function, &call.paren, arguments),
            Object::NativeFunction(native) => self.invoke(native, &call.paren, arguments),
            Object::Class(class) => {
                let class = class.borrow().clone();
                self.invoke(&class, &call.paren, arguments)
            },
            _ => Err(RuntimeError {
                token: call.paren.clone(),
                message: "Can only call functions and classes.".to_string(),
            }),
        }
    }

    fn visit_get_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Get(get) = expr else { unreachable!() };

        let object = self.evaluate(&get.object)?;

        match &object {
            Object::Instance(instance) => instance.borrow().get(&get.name, &object),
            _ => Err(RuntimeError {
                token: get.name.clone(),
                message: "Only instances have properties.".to_string(),
            }),
        }
    }

    fn visit_set_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::Set(set) = expr else { unreachable!() };

        let object = self.evaluate(&set.object)?;

        let Object::Instance(instance) = object else {
            return Err(RuntimeError {
                token: set.name.clone(),
                message: "Only instances have fields.".to_string(),
            });
        };

        let value = self.evaluate(&set.value)?;
        instance.borrow_mut().set(&set.name, value.clone());

        Ok(value)
    }

    fn visit_this_expr(&mut self, expr: &Expr) -> EvalResult {
        let Expr::This(this) = expr else { unreachable!() };

        self.look_up_variable(&this.keyword)
    }
}

impl StmtVisitor<ExecResult> for Interpreter<'_> {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Expression(data) = stmt else { unreachable!() };

        self.evaluate(&data.expr)?;

        Ok(())
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Print(data) = stmt else { unreachable!() };

        let value = self.evaluate(&data.expr)?;
        writeln!(self.output, "{value}").expect("program output to be writable");

        Ok(())
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Var(data) = stmt else { unreachable!() };

        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);

        Ok(())
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Block(data) = stmt else { unreachable!() };

        let environment = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, Rc::new(RefCell::new(environment)))
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::If(data) = stmt else { unreachable!() };

        if self.evaluate(&data.condition)?.as_bool() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::While(data) = stmt else { unreachable!() };

        while self.evaluate(&data.condition)?.as_bool() {
            self.execute(&data.body)?;
        }

        Ok(())
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Function(data) = stmt else { unreachable!() };

        // The closure is the environment live right now, so the function can
        // refer to itself through its own name.
        let function = Function::new(data, Rc::clone(&self.environment));
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));

        Ok(())
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Return(data) = stmt else { unreachable!() };

        let value = match &data.value {
            Some(value) => self.evaluate(value)?,
            None => Object::from(Literal::Nil),
        };

        Err(Unwind::Return(value))
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Class(data) = stmt else { unreachable!() };

        // Two-step definition lets methods close over the class's own name.
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));

        let mut methods = HashMap::new();
        for method in &data.methods {
            let Stmt::Function(function) = method else { unreachable!() };
            methods.insert(
                function.name.lexeme.clone(),
                Function::new(function, Rc::clone(&self.environment)),
            );
        }

        let class = Class::new(data.name.lexeme.clone(), methods);
        self.environment.borrow_mut().assign(&data.name, Object::from(Rc::new(RefCell::new(class))))?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn operator(r#type: Type, lexeme: &str) -> Token {
        Token::new(r#type, lexeme.to_string(), None, 1)
    }

    fn identifier(name: &str) -> Token {
        Token::new(Type::Identifier, name.to_string(), None, 1)
    }

    fn literal(literal: Literal) -> Box<Expr> {
        Box::new(Expr::Literal(literal))
    }

    fn binary(left: Literal, op: (Type, &str), right: Literal) -> Expr {
        Expr::Binary(crate::expr::BinaryData {
            left: literal(left),
            operator: operator(op.0, op.1),
            right: literal(right),
        })
    }

    fn evaluate(expr: &Expr) -> EvalResult {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);
        interpreter.evaluate(expr)
    }

    #[test]
    fn evaluate_literal() {
        let expr = Expr::Literal(Literal::Number(12.0));
        assert_eq!(evaluate(&expr).unwrap(), Object::from(12.0));
    }

    #[test]
    fn evaluate_unary_minus() {
        let expr = Expr::Unary(crate::expr::UnaryData {
            operator: operator(Type::Minus, "-"),
            expr: literal(Literal::Number(12.0)),
        });
        assert_eq!(evaluate(&expr).unwrap(), Object::from(-12.0));
    }

    #[test]
    fn evaluate_unary_minus_reverses_string() {
        let expr = Expr::Unary(crate::expr::UnaryData {
            operator: operator(Type::Minus, "-"),
            expr: literal(Literal::from("abc")),
        });
        assert_eq!(evaluate(&expr).unwrap(), Object::from("cba"));
    }

    #[test]
    fn evaluate_unary_minus_inverts_boolean() {
        let expr = Expr::Unary(crate::expr::UnaryData {
            operator: operator(Type::Minus, "-"),
            expr: literal(Literal::Bool(false)),
        });
        assert_eq!(evaluate(&expr).unwrap(), Object::from(true));
    }

    #[test]
    fn evaluate_unary_minus_on_nil_is_an_error() {
        let expr = Expr::Unary(crate::expr::UnaryData {
            operator: operator(Type::Minus, "-"),
            expr: literal(Literal::Nil),
        });
        assert_eq!(
            evaluate(&expr).unwrap_err().message,
            "Operand must be a number, a string, or a boolean.",
        );
    }

    #[test]
    fn evaluate_bang_uses_truthiness() {
        let expr = Expr::Unary(crate::expr::UnaryData {
            operator: operator(Type::Bang, "!"),
            expr: literal(Literal::Number(0.0)),
        });
        // 0 is truthy.
        assert_eq!(evaluate(&expr).unwrap(), Object::from(false));
    }

    #[test]
    fn evaluate_addition() {
        let expr = binary(Literal::Number(1.0), (Type::Plus, "+"), Literal::Number(2.0));
        assert_eq!(evaluate(&expr).unwrap(), Object::from(3.0));
    }

    #[test]
    fn evaluate_string_concatenation() {
        let expr = binary(Literal::from("Hello"), (Type::Plus, "+"), Literal::from("World"));
        assert_eq!(evaluate(&expr).unwrap(), Object::from("HelloWorld"));
    }

    #[test]
    fn evaluate_mixed_addition_is_an_error() {
        let expr = binary(Literal::Number(1.0), (Type::Plus, "+"), Literal::from("a"));
        assert_eq!(
            evaluate(&expr).unwrap_err().message,
            "Operands must be two numbers or two strings.",
        );
    }

    #[test]
    fn evaluate_subtraction_requires_numbers() {
        let expr = binary(Literal::from("a"), (Type::Minus, "-"), Literal::from("b"));
        assert_eq!(evaluate(&expr).unwrap_err().message, "Operands must be numbers.");
    }

    #[test]
    fn evaluate_division_by_zero_is_infinite() {
        let expr = binary(Literal::Number(1.0), (Type::Slash, "/"), Literal::Number(0.0));
        let Object::Literal(Literal::Number(value)) = evaluate(&expr).unwrap() else {
            panic!("expected a number");
        };
        assert!(value.is_infinite());
    }

    #[test]
    fn evaluate_comparison() {
        let expr = binary(Literal::Number(1.0), (Type::Less, "<"), Literal::Number(2.0));
        assert_eq!(evaluate(&expr).unwrap(), Object::from(true));

        let expr = binary(Literal::Number(1.0), (Type::GreaterEqual, ">="), Literal::Number(2.0));
        assert_eq!(evaluate(&expr).unwrap(), Object::from(false));
    }

    #[test]
    fn evaluate_comparison_requires_numbers() {
        let expr = binary(Literal::from("a"), (Type::Less, "<"), Literal::from("b"));
        assert_eq!(evaluate(&expr).unwrap_err().message, "Operands must be numbers.");
    }

    #[test]
    fn evaluate_nil_equality() {
        let expr = binary(Literal::Nil, (Type::EqualEqual, "=="), Literal::Nil);
        assert_eq!(evaluate(&expr).unwrap(), Object::from(true));

        let expr = binary(Literal::Nil, (Type::EqualEqual, "=="), Literal::Bool(false));
        assert_eq!(evaluate(&expr).unwrap(), Object::from(false));
    }

    #[test]
    fn evaluate_logical_returns_operand() {
        let expr = Expr::Logical(crate::expr::LogicalData {
            left: literal(Literal::Nil),
            operator: operator(Type::Or, "or"),
            right: literal(Literal::from("fallback")),
        });
        assert_eq!(evaluate(&expr).unwrap(), Object::from("fallback"));

        let expr = Expr::Logical(crate::expr::LogicalData {
            left: literal(Literal::from("first")),
            operator: operator(Type::Or, "or"),
            right: literal(Literal::from("second")),
        });
        assert_eq!(evaluate(&expr).unwrap(), Object::from("first"));
    }

    #[test]
    fn evaluate_grouping() {
        let expr = Expr::Grouping(crate::expr::GroupingData {
            expr: literal(Literal::Number(12.0)),
        });
        assert_eq!(evaluate(&expr).unwrap(), Object::from(12.0));
    }

    #[test]
    fn calling_a_literal_is_an_error() {
        let expr = Expr::Call(crate::expr::CallData {
            callee: literal(Literal::Number(1.0)),
            paren: operator(Type::RightParen, ")"),
            arguments: vec![],
        });
        assert_eq!(evaluate(&expr).unwrap_err().message, "Can only call functions and classes.");
    }

    #[test]
    fn clock_is_callable_with_zero_arguments() {
        let expr = Expr::Call(crate::expr::CallData {
            callee: Box::new(Expr::Variable(crate::expr::VariableData {
                name: identifier("clock"),
            })),
            paren: operator(Type::RightParen, ")"),
            arguments: vec![],
        });
        let Object::Literal(Literal::Number(seconds)) = evaluate(&expr).unwrap() else {
            panic!("expected a number");
        };
        assert!(seconds > 0.0);
    }

    #[test]
    fn clock_rejects_arguments() {
        let expr = Expr::Call(crate::expr::CallData {
            callee: Box::new(Expr::Variable(crate::expr::VariableData {
                name: identifier("clock"),
            })),
            paren: operator(Type::RightParen, ")"),
            arguments: vec![Expr::Literal(Literal::Number(1.0))],
        });
        assert_eq!(evaluate(&expr).unwrap_err().message, "Expected 0 arguments but got 1.");
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let expr = Expr::Variable(crate::expr::VariableData {
            name: identifier("missing"),
        });
        assert_eq!(evaluate(&expr).unwrap_err().message, "Undefined variable 'missing'");
    }

    #[test]
    fn print_writes_one_line() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);
        let stmt = Stmt::Print(crate::stmt::PrintData {
            expr: Expr::Literal(Literal::Number(3.0)),
        });

        interpreter.execute(&stmt).unwrap();

        drop(interpreter);
        assert_eq!(std::str::from_utf8(&output).unwrap(), "3\n");
    }
}
