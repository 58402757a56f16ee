mod api {
}
