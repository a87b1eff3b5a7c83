use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AlertVariant {
    Success,
    Danger,
    Warning,
}

impl fmt::Display for AlertVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AlertVariant::Success => write!(f, "success"),
            AlertVariant::Danger => write!(f, "danger"),
            AlertVariant::Warning => write!(f, "warning"),
        }
    }
}

/// An ephemeral notification; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub variant: AlertVariant,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Alert {
        Alert {
            message: message.into(),
            variant: AlertVariant::Success,
        }
    }

    pub fn danger(message: impl Into<String>) -> Alert {
        Alert {
            message: message.into(),
            variant: AlertVariant::Danger,
        }
    }

    pub fn warning(message: impl Into<String>) -> Alert {
        Alert {
            message: message.into(),
            variant: AlertVariant::Warning,
        }
    }
}

/// Appended-to list of alerts, dismissible one at a time
#[derive(Debug, Clone, Default)]
pub struct AlertLog {
    alerts: Vec<Alert>,
}

impl AlertLog {
    pub fn new() -> AlertLog {
        AlertLog::default()
    }

    pub fn push(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    pub fn dismiss(&mut self, idx: usize) -> Option<Alert> {
        if idx < self.alerts.len() {
            Some(self.alerts.remove(idx))
        } else {
            None
        }
    }

    pub fn drain(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }

    pub fn as_slice(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn count_of(&self, variant: AlertVariant) -> usize {
        self.alerts.iter().filter(|a| a.variant == variant).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alerts_append_in_order() {
        let mut log = AlertLog::new();
        log.push(Alert::success("held"));
        log.push(Alert::danger("failed"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.as_slice()[0].variant, AlertVariant::Success);
        assert_eq!(log.count_of(AlertVariant::Danger), 1);
    }

    #[test]
    fn dismiss_removes_by_index() {
        let mut log = AlertLog::new();
        log.push(Alert::success("a"));
        log.push(Alert::warning("b"));
        let removed = log.dismiss(0).unwrap();
        assert_eq!(removed.message, "a");
        assert_eq!(log.len(), 1);
        assert!(log.dismiss(5).is_none());
    }

    #[test]
    fn drain_empties_the_log() {
        let mut log = AlertLog::new();
        log.push(Alert::success("a"));
        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert!(log.is_empty());
    }
}
