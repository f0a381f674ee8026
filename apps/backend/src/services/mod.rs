pub mod draft_flow;
