/// In-memory, append-only list of log lines shown to the operator.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    inner: std::sync::Arc<std::sync::RwLock<Vec<String>>>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Transcript::default()
    }

    pub fn push(&self, line: String) {
        self.inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(line);
    }

    pub fn clear(&self) {
        self.inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.read().clone()
    }

    pub fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<String>> {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::Transcript;

    #[test]
    fn when_lines_are_pushed_through_a_clone_then_original_sees_them_in_order() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());

        let writer = transcript.clone();
        writer.push(String::from("first"));
        writer.push(String::from("second"));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.lines(), vec!["first", "second"]);
        assert_eq!(transcript.read().last().map(String::as_str), Some("second"));
    }

    #[test]
    fn when_cleared_then_every_handle_sees_it_empty() {
        let transcript = Transcript::new();
        let writer = transcript.clone();
        transcript.push(String::from("stale"));

        writer.clear();

        assert!(transcript.is_empty());
        assert!(writer.lines().is_empty());
    }
}
