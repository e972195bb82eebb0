use crate::error::{Result, SceneError};

/// Bounds-checked little-endian reader over an immutable byte slice.
///
/// Every read checks that enough bytes remain before touching the data and
/// only advances on success. Offsets in errors are absolute file offsets, so a
/// cursor over a single chunk payload still reports positions in the file.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
    section: &'static str,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0, "file")
    }

    /// Cursor over a sub-slice that starts `base` bytes into the file.
    pub fn with_base(data: &'a [u8], base: usize, section: &'static str) -> Self {
        Self {
            data,
            pos: 0,
            base,
            section,
        }
    }

    pub fn set_section(&mut self, section: &'static str) {
        self.section = section;
    }

    /// Absolute offset of the next byte to be read.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    fn take(&mut self, n: usize, what: impl FnOnce() -> String) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(SceneError::UnexpectedEndOfData {
                offset: self.offset(),
                section: self.section,
                what: what(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N]> {
        let bytes = self.take(N, || format!("reading {what}"))?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>("uint8")?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take_array("uint16")?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take_array("uint32")?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.take_array("float32")?))
    }

    pub fn read_f32_array(&mut self, count: usize) -> Result<Vec<f32>> {
        let size = count.saturating_mul(4);
        let bytes = self.take(size, || format!("reading float32 array of {count}"))?;
        Ok(bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect())
    }

    pub fn read_u16_array(&mut self, count: usize) -> Result<Vec<u16>> {
        let size = count.saturating_mul(2);
        let bytes = self.take(size, || format!("reading uint16 array of {count}"))?;
        Ok(bytes
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect())
    }

    /// Fixed-size tag such as the file tag or a chunk tag.
    pub fn read_tag<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.take_array("tag")
    }

    /// Reads `byte_count` bytes as UTF-8, replacing invalid sequences.
    pub fn read_string(&mut self, byte_count: usize) -> Result<String> {
        let bytes = self.take(byte_count, || format!("reading string of {byte_count} bytes"))?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n, || format!("reading {n} bytes"))
    }

    pub fn skip_bytes(&mut self, n: usize) -> Result<()> {
        self.take(n, || format!("skipping {n} bytes"))?;
        Ok(())
    }
}
