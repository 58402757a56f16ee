mod event_stream;
mod registry_loop;
