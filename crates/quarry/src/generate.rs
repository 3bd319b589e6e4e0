//! Client-side generated values.

use quarry_core::{schema::app::GeneratedValue, stmt::Value};
use std::sync::{LazyLock, Mutex};
use ulid::{Generator, Ulid};

/// Keeps ULIDs monotonic within one millisecond.
static ULIDS: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::new()));

/// A value for `generated`, or `None` when the database produces it.
pub(crate) fn generated_value(generated: GeneratedValue) -> Option<Value> {
    match generated {
        GeneratedValue::AutoIncrement => None,
        GeneratedValue::Uuid => Some(Value::String(uuid::Uuid::new_v4().to_string())),
        GeneratedValue::Ulid => Some(Value::String(ulid().to_string())),
        GeneratedValue::Now => Some(Value::DateTime(chrono::Local::now().naive_local())),
    }
}

pub(crate) fn ulid() -> Ulid {
    let mut generator = match ULIDS.lock() {
        Ok(generator) => generator,
        Err(poisoned) => poisoned.into_inner(),
    };

    // The random part overflowed within this millisecond
    generator.generate().unwrap_or_else(|_| Ulid::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ulids_increase_within_a_millisecond() {
        let ids: Vec<Ulid> = (0..64).map(|_| ulid()).collect();

        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids[0].to_string().len(), 26);
    }

    #[test]
    fn ulid_text_sorts_by_time() {
        let first = ulid();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = ulid();

        assert!(first.timestamp_ms() < second.timestamp_ms());
        assert!(first.to_string() < second.to_string());
    }
}
