use std::any::Any;
use std::fmt;

/// Relay from interaction handlers back to the application.
///
/// The engine never interprets `op` or the payload; it only forwards them to
/// the callback the application supplied for the current event.
pub struct Dispatcher<'a> {
    sink: &'a mut dyn FnMut(&str, Box<dyn Any>),
}

impl<'a> Dispatcher<'a> {
    #[inline]
    pub fn new(sink: &'a mut dyn FnMut(&str, Box<dyn Any>)) -> Self {
        Self { sink }
    }

    /// Forwards one operation to the application.
    #[inline]
    pub fn dispatch<P: Any>(&mut self, op: &str, payload: P) {
        (self.sink)(op, Box::new(payload));
    }
}

impl fmt::Debug for Dispatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatcher")
    }
}
