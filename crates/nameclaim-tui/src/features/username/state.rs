use nameclaim_core::username::MIN_LEN;

/// Form state, owned by the reducer and reset whenever the form is remounted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsernameFormState {
    /// Lowercased value shown in the field.
    pub candidate: String,
    /// The last lookup for `candidate` found it free.
    pub is_valid: bool,
    /// A lookup for `candidate` is pending.
    pub is_loading: bool,
    /// The claim write is in flight.
    pub is_submitting: bool,
}

/// Feedback line under the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperText {
    Available(String),
    TooShort,
    Taken,
}

impl HelperText {
    pub fn message(&self) -> String {
        match self {
            HelperText::Available(candidate) => format!("'{candidate}' is available"),
            HelperText::TooShort => format!("Username must be at least {MIN_LEN} characters."),
            HelperText::Taken => "Username is taken, try a different username.".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, HelperText::Available(_))
    }
}

impl UsernameFormState {
    pub fn can_submit(&self) -> bool {
        self.is_valid && !self.is_loading && !self.is_submitting
    }

    /// Nothing while loading; otherwise availability or the reason it is not.
    pub fn helper_text(&self) -> Option<HelperText> {
        if self.is_loading {
            None
        } else if self.is_valid {
            Some(HelperText::Available(self.candidate.clone()))
        } else if self.candidate.chars().count() < MIN_LEN {
            Some(HelperText::TooShort)
        } else {
            Some(HelperText::Taken)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(candidate: &str, is_valid: bool, is_loading: bool) -> UsernameFormState {
        UsernameFormState {
            candidate: candidate.to_string(),
            is_valid,
            is_loading,
            is_submitting: false,
        }
    }

    #[test]
    fn test_helper_text_is_hidden_while_loading() {
        assert_eq!(form("alice", false, true).helper_text(), None);
    }

    #[test]
    fn test_helper_text_messages() {
        assert_eq!(
            form("alice", true, false).helper_text().unwrap().message(),
            "'alice' is available"
        );
        assert_eq!(
            form("al", false, false).helper_text().unwrap().message(),
            "Username must be at least 3 characters."
        );
        assert_eq!(
            form("alice", false, false).helper_text().unwrap().message(),
            "Username is taken, try a different username."
        );
    }

    #[test]
    fn test_submit_requires_valid_and_idle() {
        assert!(form("alice", true, false).can_submit());
        assert!(!form("alice", true, true).can_submit());
        assert!(!form("alice", false, false).can_submit());

        let mut submitting = form("alice", true, false);
        submitting.is_submitting = true;
        assert!(!submitting.can_submit());
    }
}
