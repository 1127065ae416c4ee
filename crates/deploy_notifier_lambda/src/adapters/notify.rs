use crate::errors::NotificationError;

pub trait Notifier {
    fn publish(&self, subject: &str, message: &str) -> Result<(), NotificationError>;
}
