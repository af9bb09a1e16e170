use byteorder::{ByteOrder, LittleEndian};

use crate::audio::AudioId;
use crate::tracked::ModificationCounter;
use crate::types::TocEntry;

/// An entry whose payload lives in the stream file
#[derive(Debug, Clone, PartialEq)]
pub struct StreamEntry {
    pub id: u64,
    pub entry: TocEntry,

    /// TOC data of the entry, bytes `8..12` hold the payload size
    pub header: Vec<u8>,
    pub counter: ModificationCounter,
}

impl StreamEntry {
    pub fn new(entry: TocEntry, header: Vec<u8>) -> Self {
        Self {
            id: entry.file_id,
            entry,
            header,
            counter: ModificationCounter::default(),
        }
    }

    /// Pool key of the payload
    pub fn audio_id(&self) -> AudioId {
        AudioId::Resource(self.id)
    }

    pub fn is_modified(&self) -> bool {
        self.counter.is_modified()
    }

    /// TOC data with the size field set to `payload_size`
    pub fn header_for(&self, payload_size: u32) -> Vec<u8> {
        let mut header = self.header.clone();
        if header.len() < 12 {
            header.resize(12, 0);
        }
        LittleEndian::write_u32(&mut header[8..12], payload_size);
        header
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::stream::StreamEntry;
    use crate::types::TocEntry;

    #[test]
    fn header_carries_payload_size() {
        let stream = StreamEntry::new(TocEntry::default(), vec![0xAA; 16]);

        let header = stream.header_for(0x0102);
        assert_eq!(header.len(), 16);
        assert_eq!(header[8..12].to_vec(), vec![0x02, 0x01, 0x00, 0x00]);
        assert_eq!(header[..8].to_vec(), vec![0xAA; 8]);
        assert_eq!(header[12..].to_vec(), vec![0xAA; 4]);
    }
}
