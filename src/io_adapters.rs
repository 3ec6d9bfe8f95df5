use std::cell::RefCell;
use std::io::{Result as IoResult, Write};
use std::rc::Rc;
use std::time::Duration;

/// Blocking pause used by the `sleep` command.
pub trait Sleeper {
    /// Suspend the caller for `duration`. Always runs to completion.
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps on the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// In-memory sink for the lines a program prints.
///
/// The buffer sits behind an `Rc`, so a handle taken before the writer is
/// moved into an [`crate::Interpreter`] still sees every line afterwards.
#[derive(Debug, Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up the writer and keep only the captured bytes.
    pub fn into_inner(self) -> Rc<RefCell<Vec<u8>>> {
        self.buf
    }

    /// An empty sink plus a handle for reading back what the program printed.
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let writer = MemWriter::new();
        let handle = writer.buf.clone();
        (writer, handle)
    }

    /// Printed output split into lines, without the trailing newlines.
    pub fn lines(handle: &Rc<RefCell<Vec<u8>>>) -> Vec<String> {
        String::from_utf8_lossy(&handle.borrow())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

/// Records pauses instead of blocking.
///
/// Every pause is kept in [`RecordingSleeper::durations`]. When built with
/// [`RecordingSleeper::sharing`] it also appends a `sleep <seconds>` marker
/// line to a [`MemWriter`] buffer, so the position of each pause relative to
/// the printed lines can be checked.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    durations: Rc<RefCell<Vec<Duration>>>,
    output: Option<Rc<RefCell<Vec<u8>>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interleave markers with the output collected in `output`.
    pub fn sharing(output: Rc<RefCell<Vec<u8>>>) -> Self {
        Self {
            durations: Rc::default(),
            output: Some(output),
        }
    }

    /// Handle to the recorded pauses.
    pub fn durations(&self) -> Rc<RefCell<Vec<Duration>>> {
        self.durations.clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.durations.borrow_mut().push(duration);
        if let Some(output) = &self.output {
            let marker = format!("sleep {}\n", duration.as_secs_f64());
            output.borrow_mut().extend_from_slice(marker.as_bytes());
        }
    }
}
