//! Runtime value representation
//!
//! - NUMBR, NUMBAR, TROOF, NOOB: immediate values
//! - YARN: immutable, reference-counted (`Rc<str>`)
//! - BUKKIT: shared mutable array (`ValueArray`), reference semantics
//! - Functions and classes: `Rc` pointers into the AST
//! - Instances: shared, with interior-mutable field maps

use crate::ast::{ClassDef, FuncDef, TypeName};
use crate::span::Span;
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Shared growable array. Cloning shares the same storage.
#[derive(Clone, Default)]
pub struct ValueArray(Rc<RefCell<Vec<Value>>>);

impl ValueArray {
    pub fn new() -> Self {
        ValueArray(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Read an element. Out-of-range reads yield `None`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Write an element, padding with NOOB up to `index` first
    pub fn set(&self, index: usize, value: Value) {
        let mut items = self.0.borrow_mut();
        if index >= items.len() {
            items.resize(index + 1, Value::Noob);
        }
        items[index] = value;
    }

    /// Borrow the elements
    pub fn items(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    pub fn ptr_eq(&self, other: &ValueArray) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ValueArray {
    fn eq(&self, other: &Self) -> bool {
        arrays_equal(self, other, &mut Vec::new())
    }
}

// Arrays may contain themselves, so only the shape is printed
impl fmt::Debug for ValueArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(items) => f.debug_struct("ValueArray").field("len", &items.len()).finish(),
            Err(_) => f.write_str("ValueArray(<borrowed>)"),
        }
    }
}

/// Structural array equality
///
/// `seen` holds the pairs currently being compared further up; meeting one
/// again means the arrays are cyclic in the same place, which counts as equal.
fn arrays_equal(a: &ValueArray, b: &ValueArray, seen: &mut Vec<(*const (), *const ())>) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    let key = (Rc::as_ptr(&a.0) as *const (), Rc::as_ptr(&b.0) as *const ());
    if seen.contains(&key) {
        return true;
    }

    let left = a.0.borrow();
    let right = b.0.borrow();
    if left.len() != right.len() {
        return false;
    }

    seen.push(key);
    let equal = left
        .iter()
        .zip(right.iter())
        .all(|(x, y)| values_equal(x, y, seen));
    seen.pop();
    equal
}

fn values_equal(a: &Value, b: &Value, seen: &mut Vec<(*const (), *const ())>) -> bool {
    match (a, b) {
        (Value::Numbr(a), Value::Numbr(b)) => a == b,
        (Value::Numbar(a), Value::Numbar(b)) => a == b,
        (Value::Numbr(a), Value::Numbar(b)) | (Value::Numbar(b), Value::Numbr(a)) => {
            numbr_equals_numbar(*a, *b)
        }
        (Value::Yarn(a), Value::Yarn(b)) => a == b,
        (Value::Troof(a), Value::Troof(b)) => a == b,
        (Value::Noob, Value::Noob) => true,
        (Value::Bukkit(a), Value::Bukkit(b)) => arrays_equal(a, b, seen),
        (Value::FuncDef(a), Value::FuncDef(b)) => Rc::ptr_eq(a, b),
        (Value::Callable(a), Value::Callable(b)) => a == b,
        (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
        (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// Exact NUMBR/NUMBAR comparison, without rounding the integer to a float
fn numbr_equals_numbar(int: i64, float: f64) -> bool {
    // 2^63; every integral float in [-2^63, 2^63) converts to i64 exactly
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    float.fract() == 0.0 && (-LIMIT..LIMIT).contains(&float) && float as i64 == int
}

/// A function value: definition plus the instance it is bound to, if any
#[derive(Clone, Debug)]
pub struct Callable {
    pub def: Rc<FuncDef>,
    pub instance: Option<Rc<Instance>>,
}

impl Callable {
    /// Free function, not bound to any instance
    pub fn free(def: Rc<FuncDef>) -> Self {
        Self {
            def,
            instance: None,
        }
    }

    /// Method bound to `instance`
    pub fn bound(def: Rc<FuncDef>, instance: Rc<Instance>) -> Self {
        Self {
            def,
            instance: Some(instance),
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name.name
    }

    pub fn arity(&self) -> usize {
        self.def.params.len()
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        let same_instance = match (&self.instance, &other.instance) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        Rc::ptr_eq(&self.def, &other.def) && same_instance
    }
}

/// An object created by `NEW`
pub struct Instance {
    pub class: Rc<ClassDef>,
    fields: RefCell<HashMap<String, Value>>,
}

impl Instance {
    pub fn new(class: Rc<ClassDef>) -> Self {
        Self {
            class,
            fields: RefCell::new(HashMap::new()),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class.name.name
    }

    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    /// Set a field, adding it if it does not exist yet
    pub fn set_field(&self, name: impl Into<String>, value: Value) {
        self.fields.borrow_mut().insert(name.into(), value);
    }
}

// Fields may point back at the instance, so only the shape is printed
impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.fields.borrow().keys().cloned().collect();
        names.sort();
        f.debug_struct("Instance")
            .field("class", &self.class_name())
            .field("fields", &names)
            .finish()
    }
}

/// Runtime value
#[derive(Clone, Debug)]
pub enum Value {
    /// 64-bit signed integer
    Numbr(i64),
    /// 64-bit float
    Numbar(f64),
    /// String
    Yarn(Rc<str>),
    /// Boolean
    Troof(bool),
    /// Null
    Noob,
    /// Array
    Bukkit(ValueArray),
    /// A stored function definition, as bound by `HOW IZ I`
    FuncDef(Rc<FuncDef>),
    /// A function value, possibly bound to an instance
    Callable(Callable),
    /// A class, as bound by `O HAI IM`
    Class(Rc<ClassDef>),
    /// An instance of a class
    Instance(Rc<Instance>),
}

impl Value {
    /// Create a YARN value
    pub fn yarn(s: impl AsRef<str>) -> Self {
        Value::Yarn(Rc::from(s.as_ref()))
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Numbr(_) => "NUMBR",
            Value::Numbar(_) => "NUMBAR",
            Value::Yarn(_) => "YARN",
            Value::Troof(_) => "TROOF",
            Value::Noob => "NOOB",
            Value::Bukkit(_) => "BUKKIT",
            Value::FuncDef(_) | Value::Callable(_) => "FUNKSHUN",
            Value::Class(_) => "CLASS",
            Value::Instance(_) => "INSTANCE",
        }
    }

    /// FAIL and NOOB are falsy; everything else, including 0 and "", is truthy
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Troof(false) | Value::Noob)
    }

    /// Numeric view of the value, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Numbr(n) => Some(*n as f64),
            Value::Numbar(f) => Some(*f),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other, &mut Vec::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numbr(n) => write!(f, "{}", n),
            Value::Numbar(n) => {
                let text = n.to_string();
                if n.is_finite() && !text.contains('.') {
                    write!(f, "{}.0", text)
                } else {
                    f.write_str(&text)
                }
            }
            Value::Yarn(s) => f.write_str(s),
            Value::Troof(true) => f.write_str("WIN"),
            Value::Troof(false) => f.write_str("FAIL"),
            Value::Noob => f.write_str("NOOB"),
            Value::Bukkit(arr) => write!(f, "[BUKKIT of {} items]", arr.len()),
            Value::FuncDef(def) => write!(f, "[callable {}]", def.name.name),
            Value::Callable(callable) => write!(f, "[callable {}]", callable.name()),
            Value::Class(class) => write!(f, "[class {}]", class.name.name),
            Value::Instance(instance) => write!(f, "[instance of {}]", instance.class_name()),
        }
    }
}

/// Runtime error type
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    /// Name not found anywhere in the scope chain
    #[error("Variable '{name}' is not declared")]
    UndeclaredVariable { name: String, span: Span },
    /// Name already declared in the innermost scope
    #[error("Variable '{name}' is already declared in this scope")]
    DuplicateDeclaration { name: String, span: Span },
    /// Operand of the wrong type
    #[error("Type error: {msg}")]
    TypeError { msg: String, span: Span },
    #[error("Division by zero")]
    DivisionByZero { span: Span },
    #[error("Integer overflow in {op}")]
    IntegerOverflow { op: &'static str, span: Span },
    #[error("Function '{name}' expects {expected} argument(s) but got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },
    #[error("Cannot call a value of type {found}")]
    NotAFunction { found: &'static str, span: Span },
    #[error("'{name}' is not a class")]
    NotAClass { name: String, span: Span },
    #[error("Cannot access members of a value of type {found}")]
    NotAnInstance { found: &'static str, span: Span },
    #[error("Cannot index a value of type {found}")]
    NotAnArray { found: &'static str, span: Span },
    #[error("Instance of {class} has no member '{member}'")]
    NoSuchMember {
        class: String,
        member: String,
        span: Span,
    },
    #[error("ME can only be used inside a method")]
    SelfOutsideMethod { span: Span },
    #[error("Array index must be a NUMBR, found {found}")]
    IndexNotInteger { found: &'static str, span: Span },
    #[error("Cannot write to negative array index {index}")]
    NegativeIndex { index: i64, span: Span },
    #[error("Cannot MAEK a {from} into a {to}")]
    UnsupportedCoercion {
        from: &'static str,
        to: TypeName,
        span: Span,
    },
    #[error("FOUND YR can only be used inside a function")]
    ReturnOutsideFunction { span: Span },
    /// Call nesting exceeded the configured limit
    #[error("Maximum call depth of {limit} exceeded")]
    StackOverflow { limit: usize, span: Span },
    /// Writing program output failed
    #[error("Failed to write output: {message}")]
    Output { message: String, span: Span },
}

impl RuntimeError {
    /// Get the source span for this error
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::UndeclaredVariable { span, .. } => *span,
            RuntimeError::DuplicateDeclaration { span, .. } => *span,
            RuntimeError::TypeError { span, .. } => *span,
            RuntimeError::DivisionByZero { span } => *span,
            RuntimeError::IntegerOverflow { span, .. } => *span,
            RuntimeError::ArityMismatch { span, .. } => *span,
            RuntimeError::NotAFunction { span, .. } => *span,
            RuntimeError::NotAClass { span, .. } => *span,
            RuntimeError::NotAnInstance { span, .. } => *span,
            RuntimeError::NotAnArray { span, .. } => *span,
            RuntimeError::NoSuchMember { span, .. } => *span,
            RuntimeError::SelfOutsideMethod { span } => *span,
            RuntimeError::IndexNotInteger { span, .. } => *span,
            RuntimeError::NegativeIndex { span, .. } => *span,
            RuntimeError::UnsupportedCoercion { span, .. } => *span,
            RuntimeError::ReturnOutsideFunction { span } => *span,
            RuntimeError::StackOverflow { span, .. } => *span,
            RuntimeError::Output { span, .. } => *span,
        }
    }
}
