pub mod broadcast {
    pub mod broadcast;
    pub mod broadcast_response;
}

pub mod clients {
    pub mod client_list_response;
    pub mod clients;
}

pub mod error;
