//! Read cursor spanning chunk boundaries.

use bytes::Bytes;

/// The chunk currently being consumed and the offset into it.
///
/// Only the thread holding the reader guard touches the cursor.
#[derive(Debug, Default)]
pub(crate) struct ReadCursor {
    current: Option<Bytes>,
    offset: usize,
}

impl ReadCursor {
    /// Returns the unread byte count of the current chunk.
    pub(crate) fn remaining(&self) -> usize {
        self.current
            .as_ref()
            .map_or(0, |chunk| chunk.len() - self.offset)
    }

    /// Returns true if there is no current chunk or it is fully consumed.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Makes `chunk` the current chunk, starting at offset 0.
    pub(crate) fn load(&mut self, chunk: Bytes) {
        debug_assert!(self.is_exhausted(), "loading over an unread chunk");
        self.current = Some(chunk);
        self.offset = 0;
    }

    /// Copies as much of the current chunk as fits into `dst`.
    ///
    /// Returns the number of bytes copied. The chunk is released as soon as
    /// it is consumed.
    pub(crate) fn copy_to(&mut self, dst: &mut [u8]) -> usize {
        let Some(chunk) = self.current.as_ref() else {
            return 0;
        };
        let n = std::cmp::min(chunk.len() - self.offset, dst.len());
        dst[..n].copy_from_slice(&chunk[self.offset..self.offset + n]);
        self.offset += n;
        if self.offset == chunk.len() {
            self.clear();
        }
        n
    }

    /// Takes the unread remainder of the current chunk, leaving the cursor empty.
    pub(crate) fn take_remainder(&mut self) -> Option<Bytes> {
        let chunk = self.current.take()?;
        let offset = std::mem::take(&mut self.offset);
        if offset == chunk.len() {
            return None;
        }
        Some(chunk.slice(offset..))
    }

    pub(crate) fn clear(&mut self) {
        self.current = None;
        self.offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cursor() {
        let mut cursor = ReadCursor::default();
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.copy_to(&mut [0; 4]), 0);
        assert!(cursor.take_remainder().is_none());
    }

    #[test]
    fn test_partial_copies() {
        let mut cursor = ReadCursor::default();
        cursor.load(Bytes::from_static(&[1, 2, 3, 4, 5]));

        let mut dst = [0u8; 2];
        assert_eq!(cursor.copy_to(&mut dst), 2);
        assert_eq!(dst, [1, 2]);
        assert_eq!(cursor.remaining(), 3);

        let mut dst = [0u8; 8];
        assert_eq!(cursor.copy_to(&mut dst), 3);
        assert_eq!(&dst[..3], &[3, 4, 5]);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_take_remainder() {
        let mut cursor = ReadCursor::default();
        cursor.load(Bytes::from_static(&[1, 2, 3, 4]));
        cursor.copy_to(&mut [0u8; 1]);

        assert_eq!(
            cursor.take_remainder(),
            Some(Bytes::from_static(&[2, 3, 4]))
        );
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_load_after_exhaustion() {
        let mut cursor = ReadCursor::default();
        cursor.load(Bytes::from_static(&[7]));
        cursor.copy_to(&mut [0u8; 1]);
        cursor.load(Bytes::from_static(&[8, 9]));
        assert_eq!(cursor.remaining(), 2);
    }
}
