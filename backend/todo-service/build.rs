// Build script for todo-service
// Compiles todo_service.proto for gRPC server and client code generation
fn main() {
    println!("cargo:rerun-if-changed=../proto/services/todo_service.proto");

    // Client code is generated too; integration tests and callers use it
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &["../proto/services/todo_service.proto"],
            &["../proto/services"],
        )
        .expect("Failed to compile todo_service.proto for todo-service");
}
