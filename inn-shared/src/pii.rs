use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps guest PII (national id, email) so it never reaches log output.
/// Serialization passes the real value through; only Debug/Display mask it.
#[derive(Clone, Deserialize)]
pub struct Masked<T>(pub T);

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_in_logs_but_not_on_the_wire() {
        let cpf = Masked("123.456.789-00".to_string());
        assert_eq!(format!("{}", cpf), "********");
        assert_eq!(format!("{:?}", cpf), "********");
        assert_eq!(serde_json::to_string(&cpf).unwrap(), "\"123.456.789-00\"");
    }
}
