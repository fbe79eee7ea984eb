//! Compressed binary serialization of step chains
//!
//! ```text
//! header:  "ccba" | version u32 | payload length u32 | compressed length u32
//! payload: width u32 | height u32 | connectivity u32 | ncc u32
//!          per component: x i32 | y i32 | w i32 | h i32 | nborders u32
//!            per border:  startx i32 | starty i32 | nsteps u32 | packed codes
//! ```
//!
//! All integers are little-endian. The payload is zlib-compressed. Step
//! codes are packed MSB-first, 3 bits each for 8-connectivity and 2 bits
//! each for 4-connectivity.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use miniz_oxide::deflate::compress_to_vec_zlib;
use miniz_oxide::inflate::decompress_to_vec_zlib_with_limit;

use super::{Border, BorderPoint, BorderType, ComponentBorders, Direction, ImageBorders};
use crate::conncomp::ConnectivityType;
use crate::error::{RegionError, RegionResult};
use pixmorph_core::Box;

const MAGIC: &[u8; 4] = b"ccba";
const VERSION: u32 = 1;
const HEADER_LEN: usize = 16;
const COMPRESSION_LEVEL: u8 = 6;

fn code_bits(connectivity: ConnectivityType) -> u32 {
    match connectivity {
        ConnectivityType::EightWay => 3,
        ConnectivityType::FourWay => 2,
    }
}

/// MSB-first bit packer
struct BitWriter {
    bytes: Vec<u8>,
    acc: u32,
    nbits: u32,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            acc: 0,
            nbits: 0,
        }
    }

    fn push(&mut self, code: u32, bits: u32) {
        self.acc = (self.acc << bits) | code;
        self.nbits += bits;
        while self.nbits >= 8 {
            self.nbits -= 8;
            self.bytes.push((self.acc >> self.nbits) as u8);
        }
        self.acc &= (1 << self.nbits) - 1;
    }

    fn finish(mut self) -> Vec<u8> {
        if self.nbits > 0 {
            self.bytes.push((self.acc << (8 - self.nbits)) as u8);
        }
        self.bytes
    }
}

fn pack_steps(steps: &[Direction], connectivity: ConnectivityType) -> RegionResult<Vec<u8>> {
    let bits = code_bits(connectivity);
    let mut w = BitWriter::new();
    for &dir in steps {
        let code = match connectivity {
            ConnectivityType::EightWay => dir.index() as u32,
            ConnectivityType::FourWay if dir.is_axial() => dir.index() as u32 / 2,
            ConnectivityType::FourWay => {
                return Err(RegionError::InvalidParameters(format!(
                    "diagonal step {dir:?} in a 4-connected border"
                )));
            }
        };
        w.push(code, bits);
    }
    Ok(w.finish())
}

fn unpack_steps(bytes: &[u8], nsteps: usize, connectivity: ConnectivityType) -> Vec<Direction> {
    let bits = code_bits(connectivity) as usize;
    (0..nsteps)
        .map(|i| {
            let mut code = 0usize;
            for b in i * bits..(i + 1) * bits {
                let bit = (bytes[b / 8] >> (7 - b % 8)) & 1;
                code = (code << 1) | bit as usize;
            }
            match connectivity {
                ConnectivityType::EightWay => Direction::from_index(code),
                ConnectivityType::FourWay => Direction::from_index(code * 2),
            }
        })
        .collect()
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_len(out: &mut Vec<u8>, n: usize, what: &str) -> RegionResult<()> {
    let n = u32::try_from(n)
        .map_err(|_| RegionError::InvalidParameters(format!("too many {what}: {n}")))?;
    put_u32(out, n);
    Ok(())
}

/// Little-endian reader over the decompressed payload
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> RegionResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| RegionError::InvalidFormat("truncated ccba payload".into()))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u32(&mut self) -> RegionResult<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn i32(&mut self) -> RegionResult<i32> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl ImageBorders {
    fn encode_payload(&self) -> RegionResult<Vec<u8>> {
        let mut out = Vec::new();
        put_u32(&mut out, self.width);
        put_u32(&mut out, self.height);
        put_u32(&mut out, self.connectivity.value());
        put_len(&mut out, self.components.len(), "components")?;
        for cc in &self.components {
            let b = cc.bounds;
            for v in [b.x, b.y, b.w, b.h] {
                put_i32(&mut out, v);
            }
            put_len(&mut out, cc.border_count(), "borders")?;
            for border in cc.borders() {
                let steps = border.step_chain()?;
                put_i32(&mut out, border.start.x);
                put_i32(&mut out, border.start.y);
                put_len(&mut out, steps.len(), "steps")?;
                out.extend(pack_steps(steps, self.connectivity)?);
            }
        }
        Ok(out)
    }

    fn decode_payload(payload: &[u8]) -> RegionResult<Self> {
        let mut cur = Cursor::new(payload);
        let width = cur.u32()?;
        let height = cur.u32()?;
        let connectivity = ConnectivityType::from_value(cur.u32()?)
            .map_err(|e| RegionError::InvalidFormat(e.to_string()))?;
        let ncc = cur.u32()? as usize;
        let bits = code_bits(connectivity) as usize;

        let mut ccba = ImageBorders::new(width, height, connectivity);
        for _ in 0..ncc {
            let (x, y, w, h) = (cur.i32()?, cur.i32()?, cur.i32()?, cur.i32()?);
            let bounds =
                Box::new(x, y, w, h).map_err(|e| RegionError::InvalidFormat(e.to_string()))?;
            if bounds.is_empty()
                || x < 0
                || y < 0
                || i64::from(x) + i64::from(w) > i64::from(width)
                || i64::from(y) + i64::from(h) > i64::from(height)
            {
                return Err(RegionError::InvalidFormat(format!(
                    "component box {bounds:?} outside {width}x{height} image"
                )));
            }
            let nborders = cur.u32()? as usize;
            if nborders == 0 {
                return Err(RegionError::InvalidFormat(
                    "component without an outer border".into(),
                ));
            }

            let mut borders = Vec::with_capacity(nborders.min(cur.remaining()));
            for i in 0..nborders {
                let start = BorderPoint::new(cur.i32()?, cur.i32()?);
                let nsteps = cur.u32()? as usize;
                let nbytes = nsteps
                    .checked_mul(bits)
                    .map(|b| b.div_ceil(8))
                    .ok_or_else(|| RegionError::InvalidFormat("step count overflow".into()))?;
                let steps = unpack_steps(cur.take(nbytes)?, nsteps, connectivity);
                let border_type = if i == 0 {
                    BorderType::Outer
                } else {
                    BorderType::Hole
                };
                borders.push(Border::from_steps(border_type, start, steps));
            }

            let mut borders = borders.into_iter();
            let outer = borders
                .next()
                .ok_or_else(|| RegionError::InvalidFormat("missing outer border".into()))?;
            let mut cc = ComponentBorders::new(bounds, outer);
            cc.holes = borders.collect();
            ccba.components.push(cc);
        }

        if cur.remaining() != 0 {
            return Err(RegionError::InvalidFormat(format!(
                "{} trailing bytes after ccba payload",
                cur.remaining()
            )));
        }
        Ok(ccba)
    }

    /// Serialize the step chains to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::MissingData`] if step chains have not been
    /// generated, or [`RegionError::Io`] on write failure.
    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> RegionResult<()> {
        let payload = self.encode_payload()?;
        let compressed = compress_to_vec_zlib(&payload, COMPRESSION_LEVEL);

        let mut header = Vec::with_capacity(HEADER_LEN);
        header.extend_from_slice(MAGIC);
        put_u32(&mut header, VERSION);
        put_len(&mut header, payload.len(), "payload bytes")?;
        put_len(&mut header, compressed.len(), "compressed bytes")?;

        writer.write_all(&header)?;
        writer.write_all(&compressed)?;
        log::debug!(
            "ccba write: {} components, {} payload bytes, {} compressed",
            self.component_count(),
            payload.len(),
            compressed.len()
        );
        Ok(())
    }

    /// Serialize the step chains to a byte vector.
    pub fn to_bytes(&self) -> RegionResult<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to_writer(&mut out)?;
        Ok(out)
    }

    /// Serialize the step chains to a file.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> RegionResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Read serialized borders.
    ///
    /// The result holds step chains and start points only; regenerate
    /// points with [`ImageBorders::step_chains_to_pix_coords`].
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidFormat`] on a bad magic number,
    /// unsupported version, length mismatch, corrupt compressed data,
    /// truncated payload, invalid connectivity, a component box outside
    /// the image or trailing bytes.
    pub fn read_from_reader<R: Read>(reader: &mut R) -> RegionResult<Self> {
        let mut header = [0u8; HEADER_LEN];
        reader.read_exact(&mut header).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                RegionError::InvalidFormat("truncated ccba header".into())
            }
            _ => RegionError::Io(e),
        })?;
        if &header[..4] != MAGIC {
            return Err(RegionError::InvalidFormat("not a ccba stream".into()));
        }
        let word = |i: usize| {
            u32::from_le_bytes([header[i], header[i + 1], header[i + 2], header[i + 3]])
        };
        let version = word(4);
        if version != VERSION {
            return Err(RegionError::InvalidFormat(format!(
                "unsupported ccba version {version}"
            )));
        }
        let payload_len = word(8) as usize;
        let compressed_len = word(12) as usize;

        let mut compressed = Vec::new();
        reader.read_to_end(&mut compressed)?;
        if compressed.len() != compressed_len {
            return Err(RegionError::InvalidFormat(format!(
                "compressed length {} does not match header {compressed_len}",
                compressed.len()
            )));
        }
        let payload = decompress_to_vec_zlib_with_limit(&compressed, payload_len)
            .map_err(|e| RegionError::InvalidFormat(format!("decompression failed: {e:?}")))?;
        if payload.len() != payload_len {
            return Err(RegionError::InvalidFormat(format!(
                "payload length {} does not match header {payload_len}",
                payload.len()
            )));
        }

        let ccba = Self::decode_payload(&payload)?;
        log::debug!("ccba read: {} components", ccba.component_count());
        Ok(ccba)
    }

    /// Read serialized borders from a byte slice.
    pub fn from_bytes(mut bytes: &[u8]) -> RegionResult<Self> {
        Self::read_from_reader(&mut bytes)
    }

    /// Read serialized borders from a file.
    pub fn read_file<P: AsRef<Path>>(path: P) -> RegionResult<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from_reader(&mut reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ccbord::CoordType;
    use pixmorph_core::{Pix, PixelDepth};

    fn blobs() -> Pix {
        let mut pm = Pix::new(40, 30, PixelDepth::Bit1).unwrap().to_mut();
        pm.set_region(2, 2, 12, 10);
        pm.clear_region(5, 5, 4, 3);
        pm.set_region(20, 4, 1, 15);
        for i in 0..8 {
            pm.set_pixel(25 + i, 20 + i / 2, 1).unwrap();
        }
        pm.into()
    }

    #[test]
    fn test_bit_packing() {
        let steps = [Direction::SouthWest, Direction::West, Direction::East];
        // 111 000 100 -> 1110 0010 0(000 0000)
        assert_eq!(
            pack_steps(&steps, ConnectivityType::EightWay).unwrap(),
            vec![0b1110_0010, 0b0000_0000]
        );
        let packed = pack_steps(&steps, ConnectivityType::EightWay).unwrap();
        assert_eq!(unpack_steps(&packed, 3, ConnectivityType::EightWay), steps);

        let axial = [Direction::South, Direction::North, Direction::East];
        let packed = pack_steps(&axial, ConnectivityType::FourWay).unwrap();
        assert_eq!(packed, vec![0b1101_1000]);
        assert!(pack_steps(&steps, ConnectivityType::FourWay).is_err());
    }

    #[test]
    fn test_round_trip_reproduces_points() {
        for conn in [ConnectivityType::EightWay, ConnectivityType::FourWay] {
            let mut ccba = ImageBorders::from_pix(&blobs(), conn).unwrap();
            ccba.generate_step_chains().unwrap();
            ccba.generate_global_locs().unwrap();
            let bytes = ccba.to_bytes().unwrap();
            assert_eq!(&bytes[..4], b"ccba");

            let mut back = ImageBorders::from_bytes(&bytes).unwrap();
            assert_eq!(back.connectivity, conn);
            assert_eq!(back.component_count(), ccba.component_count());
            assert!(back.components.iter().all(|cc| cc.pix.is_none()));
            back.step_chains_to_pix_coords(CoordType::Global).unwrap();
            for (a, b) in ccba.components.iter().zip(&back.components) {
                assert_eq!(a.bounds, b.bounds);
                for (ba, bb) in a.borders().zip(b.borders()) {
                    assert_eq!(ba.global, bb.global);
                    assert_eq!(ba.border_type, bb.border_type);
                }
            }
        }
    }

    #[test]
    fn test_write_requires_step_chains() {
        let ccba = ImageBorders::from_pix(&blobs(), ConnectivityType::EightWay).unwrap();
        assert!(matches!(
            ccba.to_bytes(),
            Err(RegionError::MissingData(_))
        ));
    }

    #[test]
    fn test_corrupt_streams_are_rejected() {
        let mut ccba = ImageBorders::from_pix(&blobs(), ConnectivityType::EightWay).unwrap();
        ccba.generate_step_chains().unwrap();
        let bytes = ccba.to_bytes().unwrap();

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'x';
        let mut bad_version = bytes.clone();
        bad_version[4] = 9;
        let mut bad_len = bytes.clone();
        bad_len[8] ^= 1;
        let truncated = &bytes[..bytes.len() - 3];
        let mut garbage = bytes[..HEADER_LEN].to_vec();
        garbage.extend(std::iter::repeat_n(0xa5u8, bytes.len() - HEADER_LEN));

        for stream in [
            &bad_magic[..],
            &bad_version[..],
            &bad_len[..],
            truncated,
            &garbage[..],
            &bytes[..10],
        ] {
            assert!(matches!(
                ImageBorders::from_bytes(stream),
                Err(RegionError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn test_boxes_outside_the_image_are_rejected() {
        let mut ccba = ImageBorders::from_pix(&blobs(), ConnectivityType::EightWay).unwrap();
        ccba.generate_step_chains().unwrap();
        assert!(ImageBorders::from_bytes(&ccba.to_bytes().unwrap()).is_ok());

        for bounds in [
            Box::new_unchecked(-50, 7000, 0, 40000),
            Box::new_unchecked(2, 2, 0, 10),
            Box::new_unchecked(-1, 2, 12, 10),
            Box::new_unchecked(30, 2, 12, 10),
            Box::new_unchecked(2, 25, 12, 10),
            Box::new_unchecked(2, 2, i32::MAX, 10),
        ] {
            let mut bad = ccba.clone();
            bad.components[0].bounds = bounds;
            let bytes = bad.to_bytes().unwrap();
            assert!(
                matches!(
                    ImageBorders::from_bytes(&bytes),
                    Err(RegionError::InvalidFormat(_))
                ),
                "{bounds:?}"
            );
        }
    }

    #[test]
    fn test_inflate_stops_at_declared_length() {
        let mut ccba = ImageBorders::from_pix(&blobs(), ConnectivityType::EightWay).unwrap();
        ccba.generate_step_chains().unwrap();
        let mut bytes = ccba.to_bytes().unwrap();
        bytes[8..12].copy_from_slice(&4u32.to_le_bytes());
        assert!(matches!(
            ImageBorders::from_bytes(&bytes),
            Err(RegionError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_payload_trailing_bytes() {
        let ccba = ImageBorders::new(4, 4, ConnectivityType::FourWay);
        let mut payload = ccba.encode_payload().unwrap();
        assert!(ImageBorders::decode_payload(&payload).is_ok());
        payload.push(0);
        assert!(ImageBorders::decode_payload(&payload).is_err());
        assert!(ImageBorders::decode_payload(&payload[..6]).is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = std::env::temp_dir().join("pixmorph_ccba_serial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("blobs.ccba");

        let mut ccba = ImageBorders::from_pix(&blobs(), ConnectivityType::EightWay).unwrap();
        ccba.generate_step_chains().unwrap();
        ccba.write_file(&path).unwrap();
        let mut back = ImageBorders::read_file(&path).unwrap();
        back.step_chains_to_pix_coords(CoordType::Local).unwrap();
        assert!(back.display_image().unwrap().equals(&blobs()));
    }
}
