//! DER encoding helpers for building certificates and KeyDescription values.
//!
//! Also compiled into the crate's unit tests through `src/test_utils.rs`.

fn length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        vec![len as u8]
    } else if len <= 0xff {
        vec![0x81, len as u8]
    } else {
        vec![0x82, (len >> 8) as u8, len as u8]
    }
}

pub fn tlv(tag: &[u8], content: &[u8]) -> Vec<u8> {
    let mut out = tag.to_vec();
    out.extend(length(content.len()));
    out.extend_from_slice(content);
    out
}

pub fn raw_integer(content: &[u8]) -> Vec<u8> {
    tlv(&[0x02], content)
}

/// Minimal two's-complement INTEGER
pub fn integer(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    let mut content = bytes[first..].to_vec();
    if content[0] & 0x80 != 0 {
        content.insert(0, 0x00);
    }
    raw_integer(&content)
}

pub fn enumerated(value: u8) -> Vec<u8> {
    tlv(&[0x0a], &[value])
}

pub fn octet_string(bytes: &[u8]) -> Vec<u8> {
    tlv(&[0x04], bytes)
}

pub fn bit_string(bytes: &[u8]) -> Vec<u8> {
    let mut content = vec![0x00];
    content.extend_from_slice(bytes);
    tlv(&[0x03], &content)
}

pub fn oid(content: &[u8]) -> Vec<u8> {
    tlv(&[0x06], content)
}

pub fn utc_time(value: &str) -> Vec<u8> {
    tlv(&[0x17], value.as_bytes())
}

pub fn utf8_string(value: &str) -> Vec<u8> {
    tlv(&[0x0c], value.as_bytes())
}

pub fn null() -> Vec<u8> {
    vec![0x05, 0x00]
}

pub fn sequence(items: &[Vec<u8>]) -> Vec<u8> {
    tlv(&[0x30], &items.concat())
}

pub fn set(items: &[Vec<u8>]) -> Vec<u8> {
    tlv(&[0x31], &items.concat())
}

/// `[tag] EXPLICIT`, context-specific and constructed
pub fn explicit(tag: u32, inner: &[u8]) -> Vec<u8> {
    if tag < 31 {
        return tlv(&[0xa0 | tag as u8], inner);
    }
    let mut groups = Vec::new();
    let mut rest = tag;
    while rest > 0 {
        groups.push((rest & 0x7f) as u8);
        rest >>= 7;
    }
    let mut header = vec![0xbf];
    for (i, group) in groups.iter().rev().enumerate() {
        let more = if i + 1 < groups.len() { 0x80 } else { 0x00 };
        header.push(group | more);
    }
    tlv(&header, inner)
}
