mod mpsc_queue;

pub use mpsc_queue::MpscTransferQueue;
