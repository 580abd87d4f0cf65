fn main() {
    conda2pixi::main();
}
