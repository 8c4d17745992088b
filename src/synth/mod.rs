// Purpose: Voice lifecycle, polyphony table and the audio-thread engine
// This layer sits above graph nodes and owns every voice

pub mod message;
pub mod poly;
pub mod table;
pub mod voice;
