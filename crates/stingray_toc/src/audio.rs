use derive_more::derive::Display;
use stingray_bank::types::StreamType;

use crate::tracked::Tracked;

/// Key of a payload in the audio pool
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AudioId {
    /// Media stored inside banks, by Wwise short id
    #[display("{_0}")]
    Short(u32),

    /// Media stored in the stream file, by resource id
    #[display("{_0:#018x}")]
    Resource(u64),
}

/// Encoded audio shared by every bank that references it
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPayload {
    /// Wwise short id, zero until a bank references a streamed payload
    pub short_id: u32,

    /// Resource id of streamed payloads
    pub resource_id: Option<u64>,

    pub stream_type: StreamType,

    pub data: Tracked<Vec<u8>>,
}

impl AudioPayload {
    /// Payload found in a bank's `DATA` chunk
    pub fn in_bank(short_id: u32, data: Vec<u8>) -> Self {
        Self {
            short_id,
            resource_id: None,
            stream_type: StreamType::Bank,
            data: Tracked::new(data),
        }
    }

    /// Payload held by a stream entry
    pub fn streamed(resource_id: u64, data: Vec<u8>) -> Self {
        Self {
            short_id: 0,
            resource_id: Some(resource_id),
            stream_type: StreamType::Stream,
            data: Tracked::new(data),
        }
    }

    pub fn id(&self) -> AudioId {
        match self.resource_id {
            Some(resource_id) => AudioId::Resource(resource_id),
            None => AudioId::Short(self.short_id),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.data.get()
    }

    pub fn size(&self) -> usize {
        self.data.get().len()
    }

    pub fn is_modified(&self) -> bool {
        self.data.is_modified()
    }
}
