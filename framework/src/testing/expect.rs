//! Fluent assertions with expected/received output
//!
//! ```rust,ignore
//! expect!(response.status()).to_equal(201);
//! expect!(prediction.predicted_hours).to_be_greater_than_or_equal(0.5);
//! ```

use std::fmt::Debug;

pub struct Expect<T> {
    value: T,
    location: &'static str,
}

#[track_caller]
fn fail(location: &str, matcher: &str, expected: impl Debug, received: impl Debug) -> ! {
    panic!(
        "\nassertion failed at {}\n  expect!(value).{}\n\n  Expected: {:?}\n  Received: {:?}\n",
        location, matcher, expected, received
    )
}

impl<T> Expect<T> {
    /// Use the `expect!` macro instead
    pub fn new(value: T, location: &'static str) -> Self {
        Self { value, location }
    }
}

impl<T: Debug + PartialEq> Expect<T> {
    pub fn to_equal(&self, expected: T) {
        if self.value != expected {
            fail(self.location, "to_equal(expected)", expected, &self.value);
        }
    }

    pub fn to_not_equal(&self, unexpected: T) {
        if self.value == unexpected {
            fail(self.location, "to_not_equal(value)", format!("not {:?}", unexpected), &self.value);
        }
    }
}

impl<T: Debug + PartialOrd> Expect<T> {
    pub fn to_be_greater_than(&self, bound: T) {
        if self.value <= bound {
            fail(self.location, "to_be_greater_than(bound)", format!("> {:?}", bound), &self.value);
        }
    }

    pub fn to_be_greater_than_or_equal(&self, bound: T) {
        if self.value < bound {
            fail(self.location, "to_be_greater_than_or_equal(bound)", format!(">= {:?}", bound), &self.value);
        }
    }

    pub fn to_be_less_than_or_equal(&self, bound: T) {
        if self.value > bound {
            fail(self.location, "to_be_less_than_or_equal(bound)", format!("<= {:?}", bound), &self.value);
        }
    }

    /// Inclusive on both ends
    pub fn to_be_between(&self, low: T, high: T) {
        if self.value < low || self.value > high {
            fail(self.location, "to_be_between(low, high)", format!("[{:?}, {:?}]", low, high), &self.value);
        }
    }
}

impl Expect<bool> {
    pub fn to_be_true(&self) {
        if !self.value {
            fail(self.location, "to_be_true()", true, false);
        }
    }

    pub fn to_be_false(&self) {
        if self.value {
            fail(self.location, "to_be_false()", false, true);
        }
    }
}

impl<T: Debug> Expect<Option<T>> {
    pub fn to_be_some(&self) {
        if self.value.is_none() {
            fail(self.location, "to_be_some()", "Some(_)", "None");
        }
    }

    pub fn to_be_none(&self) {
        if let Some(v) = &self.value {
            fail(self.location, "to_be_none()", "None", v);
        }
    }
}

impl<T: Debug, E: Debug> Expect<Result<T, E>> {
    pub fn to_be_ok(&self) {
        if let Err(e) = &self.value {
            fail(self.location, "to_be_ok()", "Ok(_)", e);
        }
    }

    pub fn to_be_err(&self) {
        if let Ok(v) = &self.value {
            fail(self.location, "to_be_err()", "Err(_)", v);
        }
    }
}

impl Expect<String> {
    pub fn to_contain(&self, needle: &str) {
        if !self.value.contains(needle) {
            fail(self.location, "to_contain(substring)", needle, &self.value);
        }
    }
}

impl Expect<&str> {
    pub fn to_contain(&self, needle: &str) {
        if !self.value.contains(needle) {
            fail(self.location, "to_contain(substring)", needle, self.value);
        }
    }
}

impl<T: Debug + PartialEq> Expect<Vec<T>> {
    pub fn to_have_length(&self, expected: usize) {
        if self.value.len() != expected {
            fail(self.location, "to_have_length(n)", expected, self.value.len());
        }
    }

    pub fn to_contain(&self, item: &T) {
        if !self.value.contains(item) {
            fail(self.location, "to_contain(item)", item, &self.value);
        }
    }

    pub fn to_be_empty(&self) {
        if !self.value.is_empty() {
            fail(self.location, "to_be_empty()", "[]", &self.value);
        }
    }
}

/// Start a fluent assertion
#[macro_export]
macro_rules! expect {
    ($value:expr) => {
        $crate::testing::Expect::new($value, concat!(file!(), ":", line!()))
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_passing_matchers() {
        crate::expect!(3).to_equal(3);
        crate::expect!(0.5f64).to_be_between(0.1, 0.99);
        crate::expect!(vec![1, 2]).to_have_length(2);
        crate::expect!(Some(1)).to_be_some();
        crate::expect!("bearer token").to_contain("token");
    }

    #[test]
    #[should_panic(expected = "to_be_greater_than_or_equal")]
    fn test_failing_matcher_panics_with_name() {
        crate::expect!(0.4f64).to_be_greater_than_or_equal(0.5);
    }
}
