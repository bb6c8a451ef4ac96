use once_cell::sync::Lazy;

/// Byte lookup table. Any byte of a multi-byte UTF-8 sequence (>= 0x80) is
/// classified by the filter like any other byte.
#[derive(Clone)]
pub struct ByteFilter {
  table: [bool; 256],
}

impl ByteFilter {
  pub fn new() -> ByteFilter {
    ByteFilter {
      table: [false; 256],
    }
  }

  pub fn add_byte(&mut self, b: u8) {
    self.table[b as usize] = true;
  }

  pub fn add_range(&mut self, from: u8, to: u8) {
    for b in from..=to {
      self.add_byte(b);
    }
  }

  pub fn add_bytes(&mut self, bytes: &[u8]) {
    for b in bytes {
      self.add_byte(*b);
    }
  }

  #[inline]
  pub fn has(&self, b: u8) -> bool {
    self.table[b as usize]
  }
}

impl Default for ByteFilter {
  fn default() -> Self {
    Self::new()
  }
}

pub static LINE_TERMINATOR: Lazy<ByteFilter> = Lazy::new(|| {
  let mut filter = ByteFilter::new();
  filter.add_bytes(b"\n\r");
  filter
});

pub static WHITESPACE: Lazy<ByteFilter> = Lazy::new(|| {
  let mut filter = ByteFilter::new();
  // Horizontal tab, vertical tab, form feed, space.
  filter.add_bytes(b"\x09\x0b\x0c\x20");
  filter
});

pub static ID_START: Lazy<ByteFilter> = Lazy::new(|| {
  let mut filter = ByteFilter::new();
  filter.add_range(b'a', b'z');
  filter.add_range(b'A', b'Z');
  filter.add_bytes(b"$_");
  filter.add_range(0x80, 0xff);
  filter
});

pub static ID_CONTINUE: Lazy<ByteFilter> = Lazy::new(|| {
  let mut filter = ID_START.clone();
  filter.add_range(b'0', b'9');
  filter
});

#[inline]
pub fn is_line_terminator(b: u8) -> bool {
  LINE_TERMINATOR.has(b)
}

#[inline]
pub fn is_whitespace(b: u8) -> bool {
  WHITESPACE.has(b)
}

#[inline]
pub fn is_id_start(b: u8) -> bool {
  ID_START.has(b)
}

#[inline]
pub fn is_id_continue(b: u8) -> bool {
  ID_CONTINUE.has(b)
}
