/// JSON-RPC 2.0 bridge between the frontend and the engine over
/// `postMessage`.
pub mod web_rpc;
