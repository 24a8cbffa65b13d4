//! Symbolic differentiation.

use super::{BinaryOp, Builtin, Expr, RECT_HARMONICS};

impl Expr {
    /// Differentiate with respect to `var`.
    ///
    /// The result is lightly simplified: numeric subtrees are folded and
    /// identities such as `0*x`, `1*x`, `x + 0` and `x**1` are removed.
    pub fn derivative(&self, var: &str) -> Expr {
        if !self.contains(var) {
            return Expr::Number(0.0);
        }
        match self {
            Expr::Number(_) | Expr::Constant(_) => Expr::Number(0.0),
            Expr::Symbol(name) => Expr::Number(if name == var { 1.0 } else { 0.0 }),
            Expr::Neg(inner) => neg(inner.derivative(var)),
            Expr::Binary { op, lhs, rhs } => {
                let (u, v) = (lhs.as_ref(), rhs.as_ref());
                match op {
                    BinaryOp::Add => add(u.derivative(var), v.derivative(var)),
                    BinaryOp::Sub => sub(u.derivative(var), v.derivative(var)),
                    BinaryOp::Mul => add(
                        mul(u.derivative(var), v.clone()),
                        mul(u.clone(), v.derivative(var)),
                    ),
                    BinaryOp::Div => div(
                        sub(
                            mul(u.derivative(var), v.clone()),
                            mul(u.clone(), v.derivative(var)),
                        ),
                        pow(v.clone(), Expr::Number(2.0)),
                    ),
                    BinaryOp::Pow if !v.contains(var) => mul(
                        mul(v.clone(), pow(u.clone(), sub(v.clone(), Expr::Number(1.0)))),
                        u.derivative(var),
                    ),
                    BinaryOp::Pow if !u.contains(var) => mul(
                        mul(self.clone(), call(Builtin::Log, u.clone())),
                        v.derivative(var),
                    ),
                    BinaryOp::Pow => mul(
                        self.clone(),
                        add(
                            mul(v.derivative(var), call(Builtin::Log, u.clone())),
                            div(mul(v.clone(), u.derivative(var)), u.clone()),
                        ),
                    ),
                }
            },
            Expr::Call { func, arg } => {
                let inner = arg.derivative(var);
                mul(outer_derivative(*func, arg), inner)
            },
        }
    }
}

/// d/du f(u) for a builtin `f`.
fn outer_derivative(func: Builtin, u: &Expr) -> Expr {
    let u = u.clone();
    let one = || Expr::Number(1.0);
    let two = || Expr::Number(2.0);
    match func {
        Builtin::Sin => call(Builtin::Cos, u),
        Builtin::Cos => neg(call(Builtin::Sin, u)),
        Builtin::Tan => div(one(), pow(call(Builtin::Cos, u), two())),
        Builtin::Asin => div(one(), call(Builtin::Sqrt, sub(one(), pow(u, two())))),
        Builtin::Acos => neg(div(one(), call(Builtin::Sqrt, sub(one(), pow(u, two()))))),
        Builtin::Atan => div(one(), add(one(), pow(u, two()))),
        Builtin::Sinh => call(Builtin::Cosh, u),
        Builtin::Cosh => call(Builtin::Sinh, u),
        Builtin::Tanh => div(one(), pow(call(Builtin::Cosh, u), two())),
        Builtin::Exp => call(Builtin::Exp, u),
        Builtin::Log => div(one(), u),
        Builtin::Sqrt => div(one(), mul(two(), call(Builtin::Sqrt, u))),
        Builtin::Abs => call(Builtin::Sign, u),
        Builtin::Sinc => div(
            sub(call(Builtin::Cos, u.clone()), call(Builtin::Sinc, u.clone())),
            u,
        ),
        Builtin::Rect => (1..RECT_HARMONICS)
            .step_by(2)
            .map(|i| {
                let i = Expr::Number(f64::from(i));
                mul(Expr::Number(2.0 / std::f64::consts::PI), call(Builtin::Cos, mul(i, u.clone())))
            })
            .reduce(add)
            .unwrap_or(Expr::Number(0.0)),
        // Piecewise constant almost everywhere
        Builtin::Sign | Builtin::Floor | Builtin::Ceil | Builtin::Heaviside | Builtin::Noise => {
            Expr::Number(0.0)
        },
    }
}

fn number(expr: &Expr) -> Option<f64> {
    match expr {
        Expr::Number(n) => Some(*n),
        _ => None,
    }
}

fn call(func: Builtin, arg: Expr) -> Expr {
    Expr::call(func, arg)
}

fn neg(a: Expr) -> Expr {
    match a {
        Expr::Number(n) => Expr::Number(-n),
        Expr::Neg(inner) => *inner,
        other => Expr::Neg(Box::new(other)),
    }
}

fn add(a: Expr, b: Expr) -> Expr {
    match (number(&a), number(&b)) {
        (Some(x), Some(y)) => Expr::Number(x + y),
        (Some(x), _) if x == 0.0 => b,
        (_, Some(y)) if y == 0.0 => a,
        _ => Expr::binary(BinaryOp::Add, a, b),
    }
}

fn sub(a: Expr, b: Expr) -> Expr {
    match (number(&a), number(&b)) {
        (Some(x), Some(y)) => Expr::Number(x - y),
        (Some(x), _) if x == 0.0 => neg(b),
        (_, Some(y)) if y == 0.0 => a,
        _ => Expr::binary(BinaryOp::Sub, a, b),
    }
}

fn mul(a: Expr, b: Expr) -> Expr {
    match (number(&a), number(&b)) {
        (Some(x), Some(y)) => Expr::Number(x * y),
        (Some(x), _) | (_, Some(x)) if x == 0.0 => Expr::Number(0.0),
        (Some(x), _) if x == 1.0 => b,
        (_, Some(y)) if y == 1.0 => a,
        (Some(x), _) if x == -1.0 => neg(b),
        (_, Some(y)) if y == -1.0 => neg(a),
        _ => Expr::binary(BinaryOp::Mul, a, b),
    }
}

fn div(a: Expr, b: Expr) -> Expr {
    match (number(&a), number(&b)) {
        (Some(x), Some(y)) if y != 0.0 => Expr::Number(x / y),
        (Some(x), _) if x == 0.0 => Expr::Number(0.0),
        (_, Some(y)) if y == 1.0 => a,
        _ => Expr::binary(BinaryOp::Div, a, b),
    }
}

fn pow(a: Expr, b: Expr) -> Expr {
    match number(&b) {
        Some(y) if y == 0.0 => Expr::Number(1.0),
        Some(y) if y == 1.0 => a,
        _ => match (number(&a), number(&b)) {
            (Some(x), Some(y)) => Expr::Number(x.powf(y)),
            _ => Expr::binary(BinaryOp::Pow, a, b),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::super::{parse, Scope};

    fn derivative_text(text: &str) -> String {
        parse(text).unwrap().derivative("t").to_string()
    }

    fn numeric_check(text: &str, at: f64) {
        let expr = parse(text).unwrap();
        let d = expr.derivative("t");
        let names = vec!["t".to_string()];
        let eval = |e: &super::Expr, t: f64| e.eval(&Scope::new(&names, &[t])).unwrap();
        let h = 1e-6;
        let numeric = (eval(&expr, at + h) - eval(&expr, at - h)) / (2.0 * h);
        let symbolic = eval(&d, at);
        assert!(
            (numeric - symbolic).abs() < 1e-5,
            "d/dt {} at {}: numeric {} vs symbolic {} ({})",
            text,
            at,
            numeric,
            symbolic,
            d
        );
    }

    #[test]
    fn simple_rules_simplify() {
        assert_eq!(derivative_text("3*t"), "3");
        assert_eq!(derivative_text("t**2"), "2*t");
        assert_eq!(derivative_text("sin(t)"), "cos(t)");
        assert_eq!(derivative_text("5"), "0");
    }

    #[test]
    fn parameters_are_held_constant() {
        let d = parse("a*sin(k*t) + d").unwrap().derivative("t");
        assert_eq!(d.to_string(), "a*cos(k*t)*k");
    }

    #[test]
    fn derivatives_match_finite_differences() {
        for text in [
            "exp(-t**2/0.16)",
            "t*sin(3*t)/(1 + t**2)",
            "sqrt(2 + cos(t))",
            "atan(t) + tanh(t)",
            "2**t",
            "(1 + t**2)**t",
            "log(3 + sin(t))",
            "sinc(4*t)",
            "rect(t)",
            "abs(t)",
        ] {
            numeric_check(text, 0.7);
            numeric_check(text, -1.3);
        }
    }
}
