use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use randopt::distributions::{DiscretePermutationDistribution, Distribution};
use randopt::network::{FeedForwardNetwork, NeuralNetwork};
use randopt::objectives::measures::SumOfSquaresError;
use randopt::objectives::neural_network::NeuralNetworkEvaluationFunction;
use randopt::objectives::traveling_salesman::{
    random_points, TravelingSalesmanRouteEvaluationFunction, TravelingSalesmanSortEvaluationFunction,
};
use randopt::objectives::EvaluationFunction;
use randopt::operators::{CrossoverFunction, NeighborFunction, SwapNeighbor, TravelingSalesmanCrossover};
use randopt::{DataSet, Error, Instance};

fn 路线评价(b: &mut Criterion) -> Result<(), Error> {
    let mut rng = StdRng::seed_from_u64(0);
    let points = random_points(200, &mut rng);
    let mut route = TravelingSalesmanRouteEvaluationFunction::new(points.clone());
    let mut sort = TravelingSalesmanSortEvaluationFunction::new(points);
    let tour = DiscretePermutationDistribution::new(200).sample(&mut rng);
    route.value(&tour)?;
    b.bench_function("路线编码邻居评价", |b| {
        b.iter(|| {
            let neighbor = SwapNeighbor.neighbor(&tour, &mut rng);
            route.value(&neighbor)
        })
    });
    let other = DiscretePermutationDistribution::new(200).sample(&mut rng);
    b.bench_function("路线顺序杂交", |b| {
        b.iter(|| TravelingSalesmanCrossover.mate(&tour, &other, &mut rng))
    });
    b.bench_function("排序编码评价", |b| b.iter(|| sort.value(&other)));
    Ok(())
}

fn 网络评价(b: &mut Criterion) -> Result<(), Error> {
    let examples = DataSet::new(
        (0..100)
            .map(|i| {
                let data = (0..784).map(|j| ((i * 31 + j) % 256) as f64 / 255.0).collect();
                Instance::with_label(data, Instance::one_hot(10, i % 10))
            })
            .collect(),
    );
    let mut network = FeedForwardNetwork::classification(&[784, 28, 10])?;
    let weights = Instance::new(vec![0.01; network.weight_count()]);
    let mut function = NeuralNetworkEvaluationFunction::new(&mut network, &examples, SumOfSquaresError);
    function.value(&weights)?;
    b.bench_function("百个样本的网络评价", |b| b.iter(|| function.value(&weights)));
    Ok(())
}

fn 基准(b: &mut Criterion) {
    if let Err(error) = 路线评价(b).and_then(|_| 网络评价(b)) {
        panic!("基准测试准备失败：{error}");
    }
}

criterion_group!(benches, 基准);
criterion_main!(benches);
