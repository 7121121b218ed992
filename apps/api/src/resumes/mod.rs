// Resume metadata. The blob itself is uploaded to storage by the client;
// this records where it lives.

pub mod handlers;
