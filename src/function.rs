//! Waveforms: an expression of one main variable plus free parameters.

use std::fmt;

use ndarray::Array1;

use crate::error::{EpicycleError, Result};
use crate::expr::{self, Expr, Scope};

/// Default main variable.
pub const DEFAULT_VARIABLE: &str = "t";

/// A real-valued function `f(t; p1, p2, ...)`.
#[derive(Debug, Clone)]
pub struct Waveform {
    source: String,
    expr: Expr,
    /// Main variable followed by the parameters, in evaluation order.
    symbols: Vec<String>,
}

impl Waveform {
    /// Parse a waveform of `variable`.
    ///
    /// Fails when `variable` does not occur in the expression.
    pub fn parse(source: &str, variable: &str) -> Result<Self> {
        let expr = expr::parse(source)?;
        Self::from_expr(source.trim().to_string(), expr, variable)
    }

    fn from_expr(source: String, expr: Expr, variable: &str) -> Result<Self> {
        if !expr.contains(variable) {
            return Err(EpicycleError::missing_variable(variable));
        }
        let mut symbols = vec![variable.to_string()];
        symbols.extend(expr.free_symbols().into_iter().filter(|s| s != variable));
        Ok(Self {
            source,
            expr,
            symbols,
        })
    }

    /// The text the waveform was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed expression.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Main variable name.
    pub fn variable(&self) -> &str {
        &self.symbols[0]
    }

    /// Parameter names, sorted.
    pub fn parameters(&self) -> &[String] {
        &self.symbols[1..]
    }

    /// Suggested starting value for each parameter.
    ///
    /// Parameters that scale the main variable start at 1 so the waveform is
    /// not flattened; every other parameter (offsets, phases) starts at 0.
    pub fn default_values(&self) -> Vec<(String, f64)> {
        self.parameters()
            .iter()
            .map(|p| {
                let value = if self.expr.multiplies(self.variable(), p) {
                    1.0
                } else {
                    0.0
                };
                (p.clone(), value)
            })
            .collect()
    }

    /// Default parameter values without names.
    pub fn default_params(&self) -> Vec<f64> {
        self.default_values().into_iter().map(|(_, v)| v).collect()
    }

    fn check_params(&self, params: &[f64]) -> Result<()> {
        let expected = self.parameters().len();
        if params.len() != expected {
            return Err(EpicycleError::ParameterCount {
                expected,
                got: params.len(),
            });
        }
        Ok(())
    }

    /// Evaluate at a single point.
    pub fn eval(&self, t: f64, params: &[f64]) -> Result<f64> {
        self.check_params(params)?;
        let mut values = Vec::with_capacity(self.symbols.len());
        values.push(t);
        values.extend_from_slice(params);
        self.eval_with(&values)
    }

    fn eval_with(&self, values: &[f64]) -> Result<f64> {
        let value = self.expr.eval(&Scope::new(&self.symbols, values))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EpicycleError::NonFinite { at: values[0] })
        }
    }

    /// Evaluate at every point of `ts`.
    pub fn sample(&self, ts: &Array1<f64>, params: &[f64]) -> Result<Array1<f64>> {
        self.check_params(params)?;
        let mut values = Vec::with_capacity(self.symbols.len());
        values.push(0.0);
        values.extend_from_slice(params);

        let mut out = Array1::zeros(ts.len());
        for (slot, &t) in out.iter_mut().zip(ts.iter()) {
            values[0] = t;
            *slot = self.eval_with(&values)?;
        }
        Ok(out)
    }

    /// The derivative with respect to the main variable.
    ///
    /// Fails if the derivative no longer depends on the main variable
    /// (the waveform was linear).
    pub fn derivative(&self) -> Result<Self> {
        let expr = self.expr.derivative(self.variable());
        Self::from_expr(expr.to_string(), expr, self.variable())
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_main_variable() {
        let err = Waveform::parse("3*x + 1", "t").unwrap_err();
        assert!(matches!(err, EpicycleError::MissingVariable { ref variable } if variable == "t"));
    }

    #[test]
    fn orders_parameters_after_variable() {
        let w = Waveform::parse("b*sin(a*t) + c", "t").unwrap();
        assert_eq!(w.variable(), "t");
        assert_eq!(w.parameters(), ["a", "b", "c"]);
    }

    #[test]
    fn default_values_follow_scaling() {
        let w = Waveform::parse("3*exp(-t**2/(2*sigma**2))/2 - 1/2", "t").unwrap();
        assert_eq!(w.default_values(), vec![("sigma".to_string(), 1.0)]);

        let w = Waveform::parse("a*sin(10*k*(t - phi)) + d", "t").unwrap();
        assert_eq!(
            w.default_values(),
            vec![
                ("a".to_string(), 1.0),
                ("d".to_string(), 0.0),
                ("k".to_string(), 1.0),
                ("phi".to_string(), 0.0),
            ]
        );
    }

    #[test]
    fn evaluates_with_parameters() {
        let w = Waveform::parse("a*t + b", "t").unwrap();
        assert_eq!(w.eval(2.0, &[3.0, 1.0]).unwrap(), 7.0);
        assert!(matches!(
            w.eval(2.0, &[3.0]),
            Err(EpicycleError::ParameterCount {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn sampling_reports_non_finite_points() {
        let w = Waveform::parse("1/t", "t").unwrap();
        let ts = Array1::from(vec![-1.0, 0.0, 1.0]);
        let err = w.sample(&ts, &[]).unwrap_err();
        assert!(matches!(err, EpicycleError::NonFinite { at } if at == 0.0));

        let w = Waveform::parse("sqrt(t)", "t").unwrap();
        assert!(w.sample(&ts, &[]).is_err());
    }

    #[test]
    fn derivative_keeps_parameters() {
        let w = Waveform::parse("a*sin(k*t) + d", "t").unwrap();
        let d = w.derivative().unwrap();
        assert_eq!(d.parameters(), ["a", "k"]);
        let value = d.eval(0.0, &[2.0, 3.0]).unwrap();
        assert!((value - 6.0).abs() < 1e-12);
    }

    #[test]
    fn derivative_of_linear_waveform_is_rejected() {
        let w = Waveform::parse("t/pi", "t").unwrap();
        assert!(w.derivative().is_err());
    }
}
