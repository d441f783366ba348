use std::fmt;
use std::sync::Arc;

/// Function from the values of a node's active dependencies to its value.
///
/// Values arrive in the insertion order of the dependency edges, so
/// non-commutative formulas can rely on that order.
#[derive(Clone)]
pub struct Formula {
    name: &'static str,
    func: Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>,
}

impl Formula {
    /// Wrap an arbitrary function.
    pub fn custom<F>(func: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: "custom",
            func: Arc::new(func),
        }
    }

    /// Sum of the inputs; `0.0` with no active dependency.
    pub fn sum() -> Self {
        Self::builtin("sum", |values| values.iter().sum())
    }

    /// Product of the inputs; `1.0` with no active dependency.
    pub fn product() -> Self {
        Self::builtin("product", |values| values.iter().product())
    }

    /// Smallest input; `0.0` with no active dependency.
    pub fn min() -> Self {
        Self::builtin("min", |values| {
            values.iter().copied().reduce(f64::min).unwrap_or(0.0)
        })
    }

    /// Largest input; `0.0` with no active dependency.
    pub fn max() -> Self {
        Self::builtin("max", |values| {
            values.iter().copied().reduce(f64::max).unwrap_or(0.0)
        })
    }

    /// Arithmetic mean; `0.0` with no active dependency.
    pub fn mean() -> Self {
        Self::builtin("mean", |values| {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        })
    }

    fn builtin(name: &'static str, func: fn(&[f64]) -> f64) -> Self {
        Self {
            name,
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn apply(&self, values: &[f64]) -> f64 {
        (self.func)(values)
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Formula").field(&self.name).finish()
    }
}
