mod http_model_gateway;
mod http_transport;
mod response_decoder;
mod response_postprocessor;
mod sse_stream;
mod timeout_policy;
mod wire;

pub use http_model_gateway::HttpModelGateway;
pub use http_transport::{
    ByteStream, HttpResponse, HttpTransport, JsonRequest, ReqwestTransport, StreamingResponse,
    TransportError,
};
pub use response_decoder::{DecoderCascade, OllamaDecoder, OpenAiDecoder, ResponseDecoder};
pub use response_postprocessor::postprocess_response;
pub use sse_stream::SseAccumulator;
pub use timeout_policy::TimeoutPolicy;
