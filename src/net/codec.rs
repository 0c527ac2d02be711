use crate::net::messages::{
    ClientEnvelope, ClientMessage, ServerEnvelope, ServerMessage, PROTOCOL_VERSION,
};

pub fn encode_server(msg: ServerMessage) -> Result<String, serde_json::Error> {
    let env = ServerEnvelope {
        v: PROTOCOL_VERSION,
        msg,
    };
    serde_json::to_string(&env)
}

pub fn encode_client(msg: ClientMessage) -> Result<String, serde_json::Error> {
    let env = ClientEnvelope {
        v: PROTOCOL_VERSION,
        msg,
    };
    serde_json::to_string(&env)
}

pub fn decode_client(bytes: &[u8]) -> Result<ClientMessage, serde_json::Error> {
    let env: ClientEnvelope = serde_json::from_slice(bytes)?;
    Ok(env.msg)
}

pub fn decode_server(bytes: &[u8]) -> Result<ServerMessage, serde_json::Error> {
    let env: ServerEnvelope = serde_json::from_slice(bytes)?;
    Ok(env.msg)
}
