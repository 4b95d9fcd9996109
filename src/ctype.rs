use crate::character_set::character_set;

const SPACE: [bool; 256] = character_set!(b"\t\n\x0b\x0c\r ");
const PUNCT: [bool; 256] = character_set!(
    b"!\"#$%&'()*+,-./",
    b":;<=>?@",
    b"[\\]^_`",
    b"{|}~"
);

pub fn isspace(ch: u8) -> bool {
    SPACE[ch as usize]
}

pub fn ispunct(ch: u8) -> bool {
    PUNCT[ch as usize]
}

pub fn isdigit(ch: u8) -> bool {
    ch.is_ascii_digit()
}

pub fn isalpha(ch: u8) -> bool {
    ch.is_ascii_alphabetic()
}
