// A record for sequences, consisting of an identifier (the header line minus its '>') and the
// concatenated raw sequence. Records are produced once by the reader and never mutated after.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeqRecord {
    pub header: String,
    pub sequence: String,
}

impl SeqRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        SeqRecord {
            header: header.into(),
            sequence: sequence.into(),
        }
    }
}

impl From<(&str, &str)> for SeqRecord {
    fn from((header, sequence): (&str, &str)) -> Self {
        SeqRecord::new(header, sequence)
    }
}
