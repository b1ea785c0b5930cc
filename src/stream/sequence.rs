//! One logical input over several concatenated streams.

use super::{Stream, StreamKind};
use crate::error::Result;
use std::io::SeekFrom;

enum Streams<'a> {
    Owned(Box<dyn Stream>),
    Borrowed(&'a mut [Box<dyn Stream>]),
}

/// Ordered list of streams read as if their bytes were concatenated.
///
/// Exactly one stream is current. When it runs dry the sequence moves on to
/// the next one (resetting it first) and never returns to an earlier stream.
/// A page's content array is the typical multi-stream input.
pub struct StreamSequence<'a> {
    streams: Streams<'a>,
    current: usize,
}

impl StreamSequence<'static> {
    /// Sequence of one stream, owned and dropped with the sequence.
    pub fn single(mut stream: Box<dyn Stream>) -> Self {
        if let Err(e) = stream.reset() {
            log::warn!("StreamSequence: reset of {:?} stream failed: {}", stream.kind(), e);
        }
        Self {
            streams: Streams::Owned(stream),
            current: 0,
        }
    }
}

impl<'a> StreamSequence<'a> {
    /// Sequence over streams owned by the caller.
    pub fn borrowed(streams: &'a mut [Box<dyn Stream>]) -> Self {
        let mut seq = Self {
            streams: Streams::Borrowed(streams),
            current: 0,
        };
        seq.reset_current();
        seq
    }

    fn len(&self) -> usize {
        match &self.streams {
            Streams::Owned(_) => 1,
            Streams::Borrowed(list) => list.len(),
        }
    }

    /// The active stream, if any remain.
    pub fn current(&self) -> Option<&dyn Stream> {
        match &self.streams {
            Streams::Owned(s) => Some(s.as_ref()),
            Streams::Borrowed(list) => match list.get(self.current) {
                Some(s) => Some(s.as_ref()),
                None => None,
            },
        }
    }

    /// The active stream, mutably.
    pub fn current_mut(&mut self) -> Option<&mut dyn Stream> {
        match &mut self.streams {
            Streams::Owned(s) => Some(s.as_mut()),
            Streams::Borrowed(list) => match list.get_mut(self.current) {
                Some(s) => Some(s.as_mut()),
                None => None,
            },
        }
    }

    /// Index of the active stream.
    pub fn current_index(&self) -> usize {
        self.current
    }

    fn reset_current(&mut self) {
        if let Some(stream) = self.current_mut() {
            if let Err(e) = stream.reset() {
                log::warn!("StreamSequence: reset of {:?} stream failed: {}", stream.kind(), e);
            }
        }
    }

    /// Move to the next stream. Returns false when none is left.
    fn advance(&mut self) -> bool {
        if self.current + 1 >= self.len() {
            return false;
        }
        self.current += 1;
        log::trace!("StreamSequence: advancing to stream {}", self.current);
        self.reset_current();
        true
    }

    /// Next byte of the concatenation.
    pub fn get_char(&mut self) -> Option<u8> {
        loop {
            if let Some(c) = self.current_mut()?.get_char() {
                return Some(c);
            }
            if !self.advance() {
                return None;
            }
        }
    }

    /// Peek at the next byte of the concatenation.
    ///
    /// Peeking past the end of the current stream moves on to the next one.
    pub fn look_char(&mut self) -> Option<u8> {
        loop {
            if let Some(c) = self.current_mut()?.look_char() {
                return Some(c);
            }
            if !self.advance() {
                return None;
            }
        }
    }

    /// Kind of the active stream.
    pub fn kind(&self) -> Option<StreamKind> {
        self.current().map(|s| s.kind())
    }

    /// Position within the active stream; `None` for pseudo streams.
    pub fn get_pos(&self) -> Option<u64> {
        let stream = self.current()?;
        if stream.kind() == StreamKind::Weird {
            return None;
        }
        stream.get_pos()
    }

    /// Reposition within the active stream. Ignored for pseudo streams.
    pub fn set_pos(&mut self, pos: SeekFrom) -> Result<()> {
        match self.current_mut() {
            Some(stream) if stream.kind() != StreamKind::Weird => stream.set_pos(pos),
            _ => Ok(()),
        }
    }
}
