//! Expression language for waveforms.
//!
//! Waveforms are typed in as plain text such as `3*exp(-t**2/2)/2 - 1/2`.
//! This module turns that text into an [`Expr`] tree, evaluates it, and can
//! differentiate it symbolically.

mod derivative;
mod lexer;
mod parser;

use std::collections::BTreeSet;
use std::f64::consts::{E, PI};
use std::fmt;

use rand::Rng;

use crate::error::{EpicycleError, Result};

pub use parser::parse;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Exponentiation (`**` or `^`).
    Pow,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => " + ",
            BinaryOp::Sub => " - ",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 4,
        }
    }
}

/// Named mathematical constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    /// π.
    Pi,
    /// Euler's number.
    E,
}

impl Constant {
    /// Look up a constant by identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Constant::Pi),
            "E" => Some(Constant::E),
            _ => None,
        }
    }

    /// Numeric value.
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => PI,
            Constant::E => E,
        }
    }

    /// Identifier as written in expressions.
    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "E",
        }
    }
}

/// Builtin single-argument functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Inverse sine.
    Asin,
    /// Inverse cosine.
    Acos,
    /// Inverse tangent.
    Atan,
    /// Hyperbolic sine.
    Sinh,
    /// Hyperbolic cosine.
    Cosh,
    /// Hyperbolic tangent.
    Tanh,
    /// Exponential.
    Exp,
    /// Natural logarithm, also spelled `ln`.
    Log,
    /// Square root.
    Sqrt,
    /// Absolute value.
    Abs,
    /// Sign: -1, 0 or 1.
    Sign,
    /// Round down.
    Floor,
    /// Round up.
    Ceil,
    /// Unnormalised sinc: `sin(x)/x`.
    Sinc,
    /// Band-limited square wave built from the first 20 odd harmonics.
    Rect,
    /// Uniform random value in `[-1, 1)`; ignores its argument.
    Noise,
    /// Unit step with `heaviside(0) = 1/2`.
    Heaviside,
}

/// Highest odd harmonic (exclusive) summed by `rect`.
pub(crate) const RECT_HARMONICS: u32 = 40;

impl Builtin {
    /// Look up a builtin by name.
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name {
            "sin" => Builtin::Sin,
            "cos" => Builtin::Cos,
            "tan" => Builtin::Tan,
            "asin" => Builtin::Asin,
            "acos" => Builtin::Acos,
            "atan" => Builtin::Atan,
            "sinh" => Builtin::Sinh,
            "cosh" => Builtin::Cosh,
            "tanh" => Builtin::Tanh,
            "exp" => Builtin::Exp,
            "log" | "ln" => Builtin::Log,
            "sqrt" => Builtin::Sqrt,
            "abs" => Builtin::Abs,
            "sign" => Builtin::Sign,
            "floor" => Builtin::Floor,
            "ceil" => Builtin::Ceil,
            "sinc" => Builtin::Sinc,
            "rect" => Builtin::Rect,
            "noise" => Builtin::Noise,
            "heaviside" => Builtin::Heaviside,
            _ => return None,
        };
        Some(builtin)
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Tan => "tan",
            Builtin::Asin => "asin",
            Builtin::Acos => "acos",
            Builtin::Atan => "atan",
            Builtin::Sinh => "sinh",
            Builtin::Cosh => "cosh",
            Builtin::Tanh => "tanh",
            Builtin::Exp => "exp",
            Builtin::Log => "log",
            Builtin::Sqrt => "sqrt",
            Builtin::Abs => "abs",
            Builtin::Sign => "sign",
            Builtin::Floor => "floor",
            Builtin::Ceil => "ceil",
            Builtin::Sinc => "sinc",
            Builtin::Rect => "rect",
            Builtin::Noise => "noise",
            Builtin::Heaviside => "heaviside",
        }
    }

    /// Apply the function to a value.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Builtin::Sin => x.sin(),
            Builtin::Cos => x.cos(),
            Builtin::Tan => x.tan(),
            Builtin::Asin => x.asin(),
            Builtin::Acos => x.acos(),
            Builtin::Atan => x.atan(),
            Builtin::Sinh => x.sinh(),
            Builtin::Cosh => x.cosh(),
            Builtin::Tanh => x.tanh(),
            Builtin::Exp => x.exp(),
            Builtin::Log => x.ln(),
            Builtin::Sqrt => x.sqrt(),
            Builtin::Abs => x.abs(),
            Builtin::Sign => {
                if x > 0.0 {
                    1.0
                } else if x < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            },
            Builtin::Floor => x.floor(),
            Builtin::Ceil => x.ceil(),
            Builtin::Sinc => {
                if x == 0.0 {
                    1.0
                } else {
                    x.sin() / x
                }
            },
            Builtin::Rect => rect(x),
            Builtin::Noise => rand::thread_rng().gen_range(-1.0..1.0),
            Builtin::Heaviside => {
                if x > 0.0 {
                    1.0
                } else if x < 0.0 {
                    0.0
                } else {
                    0.5
                }
            },
        }
    }
}

fn rect(x: f64) -> f64 {
    let sum: f64 = (1..RECT_HARMONICS)
        .step_by(2)
        .map(|i| {
            let i = f64::from(i);
            (i * x).sin() / (PI * i)
        })
        .sum();
    2.0 * sum
}

/// Expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// Named constant such as `pi`.
    Constant(Constant),
    /// Free symbol: the main variable or a parameter.
    Symbol(String),
    /// Unary minus.
    Neg(Box<Expr>),
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Builtin function call.
    Call {
        /// Function.
        func: Builtin,
        /// Argument.
        arg: Box<Expr>,
    },
}

/// Values bound to symbols during evaluation.
///
/// `names` and `values` are parallel slices; lookup is linear, which is
/// faster than hashing for the handful of symbols a waveform has.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    names: &'a [String],
    values: &'a [f64],
}

impl<'a> Scope<'a> {
    /// Create a scope from parallel name/value slices.
    pub fn new(names: &'a [String], values: &'a [f64]) -> Self {
        Self { names, values }
    }

    /// Look up a symbol.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i).copied())
    }
}

impl Expr {
    /// Build a symbol node.
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    /// Build a binary node without simplification.
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Build a call node.
    pub fn call(func: Builtin, arg: Expr) -> Self {
        Expr::Call {
            func,
            arg: Box::new(arg),
        }
    }

    /// Evaluate the expression.
    pub fn eval(&self, scope: &Scope<'_>) -> Result<f64> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Constant(c) => Ok(c.value()),
            Expr::Symbol(name) => scope
                .get(name)
                .ok_or_else(|| EpicycleError::unbound_symbol(name.as_str())),
            Expr::Neg(inner) => Ok(-inner.eval(scope)?),
            Expr::Binary { op, lhs, rhs } => {
                let a = lhs.eval(scope)?;
                let b = rhs.eval(scope)?;
                Ok(match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Pow => a.powf(b),
                })
            },
            Expr::Call { func, arg } => Ok(func.apply(arg.eval(scope)?)),
        }
    }

    /// All free symbols, sorted.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Number(_) | Expr::Constant(_) => {},
            Expr::Symbol(name) => {
                out.insert(name.clone());
            },
            Expr::Neg(inner) => inner.collect_symbols(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_symbols(out);
                rhs.collect_symbols(out);
            },
            Expr::Call { arg, .. } => arg.collect_symbols(out),
        }
    }

    /// Check whether a symbol occurs anywhere in the expression.
    pub fn contains(&self, symbol: &str) -> bool {
        match self {
            Expr::Number(_) | Expr::Constant(_) => false,
            Expr::Symbol(name) => name == symbol,
            Expr::Neg(inner) => inner.contains(symbol),
            Expr::Binary { lhs, rhs, .. } => lhs.contains(symbol) || rhs.contains(symbol),
            Expr::Call { arg, .. } => arg.contains(symbol),
        }
    }

    /// Check whether `param` scales a sub-expression that depends on `var`.
    ///
    /// True when some product or quotient has `var` in one operand and
    /// `param` in the other. In `a*sin(k*t) + c` both `a` and `k` scale `t`
    /// but `c` does not.
    pub fn multiplies(&self, var: &str, param: &str) -> bool {
        match self {
            Expr::Number(_) | Expr::Constant(_) | Expr::Symbol(_) => false,
            Expr::Neg(inner) => inner.multiplies(var, param),
            Expr::Binary { op, lhs, rhs } => {
                let scales = matches!(op, BinaryOp::Mul | BinaryOp::Div)
                    && ((lhs.contains(var) && rhs.contains(param))
                        || (rhs.contains(var) && lhs.contains(param)));
                scales || lhs.multiplies(var, param) || rhs.multiplies(var, param)
            },
            Expr::Call { arg, .. } => arg.multiplies(var, param),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(n) if *n < 0.0 => 3,
            Expr::Number(_) | Expr::Constant(_) | Expr::Symbol(_) | Expr::Call { .. } => 5,
            Expr::Neg(_) => 3,
            Expr::Binary { op, .. } => op.precedence(),
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Constant(c) => f.write_str(c.name()),
            Expr::Symbol(name) => f.write_str(name),
            Expr::Neg(inner) => {
                f.write_str("-")?;
                write_operand(f, inner, inner.precedence() < 3)
            },
            Expr::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                let (lhs_parens, rhs_parens) = match op {
                    BinaryOp::Add | BinaryOp::Mul => (lhs.precedence() < prec, rhs.precedence() < prec),
                    BinaryOp::Sub | BinaryOp::Div => {
                        (lhs.precedence() < prec, rhs.precedence() <= prec)
                    },
                    BinaryOp::Pow => (lhs.precedence() <= prec, rhs.precedence() < 3),
                };
                write_operand(f, lhs, lhs_parens)?;
                f.write_str(op.symbol())?;
                // "a - -b" reads badly; the parser accepts it but keep it explicit
                let rhs_parens = rhs_parens
                    || (matches!(op, BinaryOp::Add | BinaryOp::Sub) && rhs.precedence() == 3);
                write_operand(f, rhs, rhs_parens)
            },
            Expr::Call { func, arg } => write!(f, "{}({})", func.name(), arg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_with(text: &str, names: &[&str], values: &[f64]) -> f64 {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        parse(text).unwrap().eval(&Scope::new(&names, values)).unwrap()
    }

    #[test]
    fn evaluates_arithmetic() {
        assert_eq!(eval_with("1 + 2*3", &[], &[]), 7.0);
        assert_eq!(eval_with("(1 + 2)*3", &[], &[]), 9.0);
        assert_eq!(eval_with("2**3**2", &[], &[]), 512.0);
        assert_eq!(eval_with("-t**2", &["t"], &[3.0]), -9.0);
        assert_eq!(eval_with("2^-1", &[], &[]), 0.5);
    }

    #[test]
    fn evaluates_builtins() {
        assert_eq!(eval_with("sinc(0)", &[], &[]), 1.0);
        assert!((eval_with("sinc(pi)", &[], &[])).abs() < 1e-12);
        assert_eq!(eval_with("heaviside(0)", &[], &[]), 0.5);
        assert_eq!(eval_with("abs(-2.5)", &[], &[]), 2.5);
        assert!((eval_with("ln(E)", &[], &[]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rect_is_a_square_wave() {
        let high = eval_with("rect(pi/2)", &[], &[]);
        let low = eval_with("rect(-pi/2)", &[], &[]);
        assert!((high - 0.5).abs() < 0.02, "rect(pi/2) = {}", high);
        assert!((low + 0.5).abs() < 0.02, "rect(-pi/2) = {}", low);
    }

    #[test]
    fn noise_stays_in_range() {
        for _ in 0..100 {
            let v = eval_with("noise(t)", &["t"], &[0.0]);
            assert!((-1.0..1.0).contains(&v));
        }
    }

    #[test]
    fn unbound_symbol_is_an_error() {
        let expr = parse("a*t").unwrap();
        let names = vec!["t".to_string()];
        let err = expr.eval(&Scope::new(&names, &[1.0])).unwrap_err();
        assert!(matches!(err, EpicycleError::UnboundSymbol { ref name } if name == "a"));
    }

    #[test]
    fn lowercase_e_is_a_symbol() {
        let expr = parse("e**10*tan(f) + E").unwrap();
        let symbols: Vec<_> = expr.free_symbols().into_iter().collect();
        assert_eq!(symbols, vec!["e".to_string(), "f".to_string()]);
    }

    #[test]
    fn multiplies_matches_scaling_parameters() {
        let expr = parse("a*sinh(k*x) + c").unwrap();
        assert!(expr.multiplies("x", "a"));
        assert!(expr.multiplies("x", "k"));
        assert!(!expr.multiplies("x", "c"));

        let expr = parse("w*a**pi*sin(k**10*tan(y*x)*z) + d + e**10*tan(f)").unwrap();
        for p in ["w", "a", "k", "z", "y"] {
            assert!(expr.multiplies("x", p), "{} should scale x", p);
        }
        for p in ["d", "e", "f"] {
            assert!(!expr.multiplies("x", p), "{} should not scale x", p);
        }

        let expr = parse("a*sinh(x*(b**2 + 45.0*c)) + d").unwrap();
        assert!(expr.multiplies("x", "b"));
        assert!(expr.multiplies("x", "c"));
        assert!(!expr.multiplies("x", "d"));
    }

    #[test]
    fn phase_offsets_do_not_scale() {
        let expr = parse("a*sin(10*k*(t - phi))").unwrap();
        assert!(expr.multiplies("t", "k"));
        assert!(!expr.multiplies("t", "phi"));
    }

    #[test]
    fn display_round_trips() {
        for text in [
            "3*exp(-t**2/(2*sigma**2))/2 - 1/2",
            "a - (b - c)",
            "(a + b)*c",
            "(-a)**2",
            "-(a*b)",
            "t/(2*pi)",
            "(2**3)**2",
            "a - -b",
        ] {
            let expr = parse(text).unwrap();
            let printed = expr.to_string();
            let reparsed = parse(&printed).unwrap();
            assert_eq!(expr, reparsed, "{} printed as {}", text, printed);
        }
    }
}
