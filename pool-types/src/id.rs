use uuid::Uuid;

/// Opaque string identifier, unique with overwhelming probability.
///
/// Used for pools, participants, and contribution records alike; the rest
/// of the model never inspects the contents.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }
}
