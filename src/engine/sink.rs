//! Sink trait for master bus output

use super::format::Frame;
use crate::error::{Error, Result};

/// Destination for encoded frames.
///
/// `write` either consumes or buffers the frame and returns once it has
/// been accepted. `close` releases the underlying resource; writes after
/// closing fail.
pub trait Sink {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Accept one frame
    fn write(&mut self, frame: &Frame) -> Result<()>;

    /// Release the sink. Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;

    fn is_closed(&self) -> bool;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn write(&mut self, frame: &Frame) -> Result<()> {
        (**self).write(frame)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

/// Discards every frame
#[derive(Debug, Default)]
pub struct NullSink {
    closed: bool,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for NullSink {
    fn name(&self) -> &str {
        "null"
    }

    fn write(&mut self, _frame: &Frame) -> Result<()> {
        if self.closed {
            return Err(Error::SinkClosed(self.name().to_string()));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Keeps every frame in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    name: String,
    frames: Vec<Frame>,
    closed: bool,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Frames in the order they were written
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// All samples written, concatenated
    pub fn samples(&self) -> Vec<i32> {
        self.frames.iter().flat_map(|f| f.samples().iter().copied()).collect()
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, frame: &Frame) -> Result<()> {
        if self.closed {
            return Err(Error::SinkClosed(self.name.clone()));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::format::BitDepth;

    #[test]
    fn test_memory_sink_records_in_order() {
        let mut sink = MemorySink::new("mem");
        sink.write(&Frame::new(BitDepth::Sixteen, vec![1, 1])).unwrap();
        sink.write(&Frame::new(BitDepth::Sixteen, vec![2, 2])).unwrap();

        assert_eq!(sink.frames().len(), 2);
        assert_eq!(sink.samples(), vec![1, 1, 2, 2]);
    }

    #[test]
    fn test_write_after_close_fails() {
        let mut sink = MemorySink::new("mem");
        sink.close().unwrap();
        assert!(sink.is_closed());

        let err = sink.write(&Frame::new(BitDepth::Eight, vec![0, 0])).unwrap_err();
        assert!(matches!(err, Error::SinkClosed(name) if name == "mem"));
    }

    #[test]
    fn test_null_sink() {
        let mut sink: Box<dyn Sink> = Box::new(NullSink::new());
        assert_eq!(sink.name(), "null");
        sink.write(&Frame::new(BitDepth::Eight, vec![1, 2])).unwrap();
        sink.close().unwrap();
        sink.close().unwrap();
        assert!(sink.is_closed());
    }
}
