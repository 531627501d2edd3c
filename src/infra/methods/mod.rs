mod gateway;

pub use gateway::MethodGateway;
